//! Labeled feature records consumed by the learner.
//!
//! A [`Record`] is a flat bag of named field values produced by an external
//! feature extractor, plus an optional label (the comment category). The
//! learner only ever reads records; they are immutable once built.
//!
//! # Missing Values
//!
//! A field that was never assigned is simply absent. Features decide how an
//! absent field is interpreted: discrete features treat it as its own
//! category, membership features as an empty token set, and quantitative
//! features as "undefined".
//!
//! # Derived Fields
//!
//! Numeric fields computed from other fields (line/column deltas) live in a
//! separate [`DerivedFeatures`] struct computed once at construction time, so
//! the extractor's field map is never rewritten.

mod derived;
mod record;

pub use derived::DerivedFeatures;
pub use record::{FieldValue, LabeledRecord, Record, RecordBuilder, Value};
