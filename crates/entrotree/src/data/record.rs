//! Record storage and field access.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::derived::DerivedFeatures;

// =============================================================================
// Value
// =============================================================================

/// An owned field value as produced by the feature extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Integer value (line numbers, offsets, counts).
    Int(i64),
    /// Free-form text value (node types, comma-separated type lists).
    Text(String),
}

impl Value {
    /// Borrow this value as a [`FieldValue`].
    #[inline]
    pub fn as_field(&self) -> FieldValue<'_> {
        match self {
            Value::Int(v) => FieldValue::Int(*v),
            Value::Text(s) => FieldValue::Text(s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// A borrowed view of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Int(i64),
    Text(&'a str),
}

impl FieldValue<'_> {
    /// Interpret the value as a number.
    ///
    /// Text values are parsed; anything that does not parse as a finite
    /// number is treated as undefined.
    pub fn as_number(&self) -> Option<f64> {
        match *self {
            FieldValue::Int(v) => Some(v as f64),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

// =============================================================================
// Record
// =============================================================================

/// A labeled feature bag describing one comment instance.
///
/// Field lookup checks the extractor's fields first and falls back to the
/// [`DerivedFeatures`] computed at construction.
///
/// Serializes as `{"fields": {...}, "label": ...}`; derived fields are
/// recomputed on deserialization rather than stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RecordData", into = "RecordData")]
pub struct Record {
    fields: BTreeMap<String, Value>,
    derived: DerivedFeatures,
    label: Option<String>,
}

impl Record {
    /// Start building a record.
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    /// Create a record from a field map and an optional label.
    pub fn new(fields: BTreeMap<String, Value>, label: Option<String>) -> Self {
        let derived = DerivedFeatures::from_fields(&fields);
        Self {
            fields,
            derived,
            label,
        }
    }

    /// Look up a field by name.
    ///
    /// Returns `None` if neither the extractor nor the derived features
    /// provide a value.
    pub fn get(&self, name: &str) -> Option<FieldValue<'_>> {
        match self.fields.get(name) {
            Some(v) => Some(v.as_field()),
            None => self.derived.get(name).map(FieldValue::Int),
        }
    }

    /// Whether the record provides a value for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The raw fields supplied by the extractor.
    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    /// Fields derived from the raw fields.
    pub fn derived(&self) -> &DerivedFeatures {
        &self.derived
    }

    /// The category label, if known.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Pair the record with its label for training.
    ///
    /// Returns `None` for unlabeled records.
    pub fn labeled(&self) -> Option<LabeledRecord<'_>> {
        self.label().map(|label| LabeledRecord {
            record: self,
            label,
        })
    }
}

/// Wire form of [`Record`].
#[derive(Serialize, Deserialize)]
struct RecordData {
    fields: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl From<RecordData> for Record {
    fn from(data: RecordData) -> Self {
        Record::new(data.fields, data.label)
    }
}

impl From<Record> for RecordData {
    fn from(record: Record) -> Self {
        Self {
            fields: record.fields,
            label: record.label,
        }
    }
}

/// A record whose label is known to be present.
#[derive(Debug, Clone, Copy)]
pub struct LabeledRecord<'r> {
    pub record: &'r Record,
    pub label: &'r str,
}

// =============================================================================
// RecordBuilder
// =============================================================================

/// Incremental builder for [`Record`].
///
/// # Example
///
/// ```
/// use entrotree::data::Record;
///
/// let record = Record::builder()
///     .field("type", "LineComment")
///     .field("line", 10)
///     .field("prevLine", 7)
///     .label("precondition")
///     .build();
///
/// assert_eq!(record.label(), Some("precondition"));
/// assert_eq!(record.derived().delta_line, Some(3));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    fields: BTreeMap<String, Value>,
    label: Option<String>,
}

impl RecordBuilder {
    /// Set a field, replacing any earlier value under the same name.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Set the label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Finish the record, computing derived fields.
    pub fn build(self) -> Record {
        Record::new(self.fields, self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_prefers_raw_fields() {
        let record = Record::builder()
            .field("line", 12)
            .field("prevLine", 2)
            .field("deltaLine", "overridden")
            .build();

        assert_eq!(record.get("deltaLine"), Some(FieldValue::Text("overridden")));
        assert_eq!(record.derived().delta_line, Some(10));
    }

    #[test]
    fn get_falls_back_to_derived() {
        let record = Record::builder().field("line", 12).field("prevLine", 2).build();
        assert_eq!(record.get("deltaLine"), Some(FieldValue::Int(10)));
        assert!(record.contains("deltaLine"));
        assert!(!record.contains("deltaCols"));
    }

    #[test]
    fn unlabeled_record_is_not_trainable() {
        let record = Record::builder().field("type", "Block").build();
        assert!(record.labeled().is_none());

        let record = Record::builder().label("a").build();
        let labeled = record.labeled().unwrap();
        assert_eq!(labeled.label, "a");
    }

    #[test]
    fn numeric_interpretation() {
        assert_eq!(FieldValue::Int(4).as_number(), Some(4.0));
        assert_eq!(FieldValue::Text(" 2.5 ").as_number(), Some(2.5));
        assert_eq!(FieldValue::Text("undefined").as_number(), None);
        assert_eq!(FieldValue::Text("NaN").as_number(), None);
    }

    #[test]
    fn value_serde_is_untagged() {
        let json = serde_json::to_string(&Value::Int(3)).unwrap();
        assert_eq!(json, "3");
        let parsed: Value = serde_json::from_str(r#""Block""#).unwrap();
        assert_eq!(parsed, Value::Text("Block".into()));
    }

    #[test]
    fn record_serde_recomputes_derived_fields() {
        let record: Record = serde_json::from_str(
            r#"{"fields": {"type": "LineComment", "line": 9, "prevLine": 4}, "label": "instruction"}"#,
        )
        .unwrap();
        assert_eq!(record.label(), Some("instruction"));
        assert_eq!(record.get("deltaLine"), Some(FieldValue::Int(5)));

        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("deltaLine"), "{json}");
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);

        let unlabeled: Record = serde_json::from_str(r#"{"fields": {}}"#).unwrap();
        assert_eq!(unlabeled.label(), None);
        assert!(!serde_json::to_string(&unlabeled).unwrap().contains("label"));
    }
}
