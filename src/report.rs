//! Field-keyed error report
//!
//! An ordered mapping from field name to a list of error messages, with one
//! reserved key for errors that belong to the form as a whole rather than to
//! any single field.
//!
//! # Invariants
//!
//! - A key present in the report always has a non-empty message list;
//!   "no errors for a key" means the key is absent.
//! - Key order is insertion order, which the pipeline keeps aligned with
//!   field declaration order.

use indexmap::IndexMap;
use serde::Serialize;

use crate::errors::ValidationError;

/// Reserved key for errors not attributable to a single field.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Ordered collection of per-field error message lists.
///
/// Serializes to a JSON object keyed by field name with message arrays, the
/// reserved key spelled `"__all__"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorReport {
    entries: IndexMap<String, Vec<String>>,
}

impl ErrorReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a validation error under the given key.
    ///
    /// Messages append to any already recorded for the key.
    pub fn add(&mut self, key: impl Into<String>, error: ValidationError) {
        self.entries
            .entry(key.into())
            .or_insert_with(Vec::new)
            .extend(error.into_messages());
    }

    /// True iff the report has at least one key.
    pub fn is_populated(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Number of keys carrying errors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True iff no key carries errors.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The messages recorded for a key, or an empty slice.
    pub fn field_errors(&self, key: &str) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The messages recorded under the reserved non-field key.
    pub fn non_field_errors(&self) -> &[String] {
        self.field_errors(NON_FIELD_ERRORS)
    }

    /// True iff the key carries at least one message.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `(key, messages)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, messages)| (key.as_str(), messages.as_slice()))
    }
}
