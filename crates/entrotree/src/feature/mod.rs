//! Feature algebra: how values are read from records and how splits are proposed.
//!
//! A [`Feature`] is a named, stateless strategy. Its [`FeatureKind`] selects
//! one of four behaviors:
//!
//! | Kind            | Value read                     | Outcome keys            |
//! |-----------------|--------------------------------|-------------------------|
//! | `Discrete`      | raw field value                | the value itself        |
//! | `DiscreteFirst` | first comma-delimited token    | the token itself        |
//! | `Membership`    | set of comma-delimited tokens  | `true` / `false`        |
//! | `Quantitative`  | number, possibly undefined     | `lt` / `ge` / `un`      |
//!
//! Features carry no per-tree state, so a single instance (usually held in a
//! [`FeatureRegistry`]) is shared by every branch that splits on it.

mod registry;
mod split;

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::{FieldValue, LabeledRecord, Record};

pub use registry::{FeatureRegistry, RegistryError};
pub use split::Split;

// =============================================================================
// FeatureKind
// =============================================================================

/// The split strategy of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Group records by raw value.
    Discrete,
    /// Group records by the first token of a comma-separated list.
    DiscreteFirst,
    /// Split on whether a token appears in a comma-separated list.
    Membership,
    /// Split on a numeric threshold; undefined values get their own bucket.
    Quantitative,
}

impl FeatureKind {
    /// Short tag used in dumps (`DF`, `DF1`, `MF`, `QF`).
    pub fn tag(self) -> &'static str {
        match self {
            FeatureKind::Discrete => "DF",
            FeatureKind::DiscreteFirst => "DF1",
            FeatureKind::Membership => "MF",
            FeatureKind::Quantitative => "QF",
        }
    }

    /// Whether a split argument has the shape this kind produces.
    pub fn accepts(self, arg: &SplitArg) -> bool {
        matches!(
            (self, arg),
            (FeatureKind::Discrete | FeatureKind::DiscreteFirst, SplitArg::None)
                | (FeatureKind::Membership, SplitArg::Token(_))
                | (FeatureKind::Quantitative, SplitArg::Threshold(_))
        )
    }
}

// =============================================================================
// FeatureValue / OutcomeKey / SplitArg
// =============================================================================

/// The value a feature reads from a record.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue<'r> {
    /// A categorical value; `None` when the field is absent.
    Category(Option<Cow<'r, str>>),
    /// A token set; empty when the field is absent.
    Tokens(Vec<Cow<'r, str>>),
    /// A number; `None` when the field is absent or not numeric.
    Number(Option<f64>),
}

/// The result of applying a branch's feature to a record.
///
/// Selects which child of the branch a record descends into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OutcomeKey {
    /// Categorical value; `None` groups records where the field is absent.
    Category(Option<String>),
    /// Whether the split token is a member of the record's token set.
    Member(bool),
    /// Value is below the threshold.
    Lt,
    /// Value is at or above the threshold.
    Ge,
    /// Value is undefined.
    Undefined,
}

impl OutcomeKey {
    /// Wire name of the quantitative keys.
    pub const LT: &'static str = "lt";
    pub const GE: &'static str = "ge";
    pub const UNDEFINED: &'static str = "un";
}

impl fmt::Display for OutcomeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeKey::Category(Some(v)) => write!(f, "{v:?}"),
            OutcomeKey::Category(None) => f.write_str("None"),
            OutcomeKey::Member(b) => write!(f, "{b}"),
            OutcomeKey::Lt => f.write_str(Self::LT),
            OutcomeKey::Ge => f.write_str(Self::GE),
            OutcomeKey::Undefined => f.write_str(Self::UNDEFINED),
        }
    }
}

/// The argument a branch passes to [`Feature::ident`].
#[derive(Debug, Clone, PartialEq)]
pub enum SplitArg {
    /// Discrete features need no argument.
    None,
    /// Membership token.
    Token(String),
    /// Quantitative threshold.
    Threshold(f64),
}

impl fmt::Display for SplitArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitArg::None => f.write_str("None"),
            SplitArg::Token(t) => write!(f, "{t:?}"),
            SplitArg::Threshold(t) => write!(f, "<{t}"),
        }
    }
}

// =============================================================================
// Feature
// =============================================================================

/// A named strategy for reading a record field and splitting on it.
///
/// `name` identifies the feature (in configs and persisted trees); `attr` is
/// the record field it reads. Several features may read the same field, e.g.
/// `parentTypes1` and `parentTypesA` both read `parentTypes`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Feature {
    name: String,
    attr: String,
    kind: FeatureKind,
}

impl Feature {
    /// Create a feature of the given kind.
    pub fn new(name: impl Into<String>, attr: impl Into<String>, kind: FeatureKind) -> Self {
        Self {
            name: name.into(),
            attr: attr.into(),
            kind,
        }
    }

    /// Discrete feature over the raw value of `attr`.
    pub fn discrete(name: impl Into<String>, attr: impl Into<String>) -> Self {
        Self::new(name, attr, FeatureKind::Discrete)
    }

    /// Discrete feature over the first token of `attr`.
    pub fn discrete_first(name: impl Into<String>, attr: impl Into<String>) -> Self {
        Self::new(name, attr, FeatureKind::DiscreteFirst)
    }

    /// Membership feature over the token set of `attr`.
    pub fn membership(name: impl Into<String>, attr: impl Into<String>) -> Self {
        Self::new(name, attr, FeatureKind::Membership)
    }

    /// Quantitative feature over the numeric value of `attr`.
    pub fn quantitative(name: impl Into<String>, attr: impl Into<String>) -> Self {
        Self::new(name, attr, FeatureKind::Quantitative)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn attr(&self) -> &str {
        &self.attr
    }

    #[inline]
    pub fn kind(&self) -> FeatureKind {
        self.kind
    }

    /// Read this feature's value from a record.
    pub fn get<'r>(&self, record: &'r Record) -> FeatureValue<'r> {
        let field = record.get(&self.attr);
        match self.kind {
            FeatureKind::Discrete => FeatureValue::Category(field.map(category)),
            FeatureKind::DiscreteFirst => FeatureValue::Category(field.map(first_token)),
            FeatureKind::Membership => FeatureValue::Tokens(field.map(tokens).unwrap_or_default()),
            FeatureKind::Quantitative => FeatureValue::Number(field.and_then(|v| v.as_number())),
        }
    }

    /// Propose the lowest-entropy split of `records` on this feature.
    ///
    /// Returns `None` when the feature cannot discriminate the records, e.g.
    /// every record has the same value. That is an expected outcome: callers
    /// move on to the next feature.
    pub fn split<'r>(&self, records: &[LabeledRecord<'r>]) -> Option<Split<'r>> {
        match self.kind {
            FeatureKind::Discrete | FeatureKind::DiscreteFirst => {
                split::split_discrete(records, |r| self.category_key(r))
            }
            FeatureKind::Membership => split::split_membership(records, |r| match self.get(r) {
                FeatureValue::Tokens(t) => t,
                _ => Vec::new(),
            }),
            FeatureKind::Quantitative => split::split_quantitative(records, |r| self.number(r)),
        }
    }

    /// Compute the outcome key a branch with argument `arg` assigns to `record`.
    ///
    /// An argument of the wrong shape for this kind never matches: membership
    /// yields `Member(false)` and quantitative yields `Undefined`.
    pub fn ident(&self, arg: &SplitArg, record: &Record) -> OutcomeKey {
        match self.kind {
            FeatureKind::Discrete | FeatureKind::DiscreteFirst => self.category_key(record),
            FeatureKind::Membership => match (arg, self.get(record)) {
                (SplitArg::Token(token), FeatureValue::Tokens(tokens)) => {
                    OutcomeKey::Member(tokens.iter().any(|t| t == token))
                }
                _ => OutcomeKey::Member(false),
            },
            FeatureKind::Quantitative => match (arg, self.number(record)) {
                (SplitArg::Threshold(threshold), Some(v)) => {
                    if v < *threshold {
                        OutcomeKey::Lt
                    } else {
                        OutcomeKey::Ge
                    }
                }
                _ => OutcomeKey::Undefined,
            },
        }
    }

    fn category_key(&self, record: &Record) -> OutcomeKey {
        match self.get(record) {
            FeatureValue::Category(v) => OutcomeKey::Category(v.map(Cow::into_owned)),
            _ => OutcomeKey::Category(None),
        }
    }

    fn number(&self, record: &Record) -> Option<f64> {
        match self.get(record) {
            FeatureValue::Number(v) => v,
            _ => None,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}: {}>", self.kind.tag(), self.name)
    }
}

fn category(value: FieldValue<'_>) -> Cow<'_, str> {
    match value {
        FieldValue::Text(s) => Cow::Borrowed(s),
        FieldValue::Int(v) => Cow::Owned(v.to_string()),
    }
}

fn first_token(value: FieldValue<'_>) -> Cow<'_, str> {
    match value {
        FieldValue::Text(s) => Cow::Borrowed(s.split(',').next().unwrap_or(s)),
        FieldValue::Int(v) => Cow::Owned(v.to_string()),
    }
}

fn tokens(value: FieldValue<'_>) -> Vec<Cow<'_, str>> {
    match value {
        FieldValue::Text(s) => s
            .split(',')
            .filter(|t| !t.is_empty())
            .map(Cow::Borrowed)
            .collect(),
        FieldValue::Int(v) => vec![Cow::Owned(v.to_string())],
    }
}
