//! Concrete field doubles for unit tests.
//!
//! The crate proper treats fields as opaque capabilities; these minimal
//! text/integer implementations exist so the engine has something to clean.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};

use crate::errors::{CleanResult, ValidationError};
use crate::field::{DataMap, FieldCapability};

/// Plain text input. Empty or absent counts as missing.
#[derive(Clone, Default)]
pub(crate) struct TextField {
    required: bool,
    initial: Option<String>,
    label: Option<String>,
    help_text: Option<String>,
    hidden_initial: bool,
    max_length: Option<usize>,
}

impl TextField {
    pub(crate) fn new() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    pub(crate) fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub(crate) fn initial(mut self, value: &str) -> Self {
        self.initial = Some(value.to_string());
        self
    }

    pub(crate) fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub(crate) fn help_text(mut self, text: &str) -> Self {
        self.help_text = Some(text.to_string());
        self
    }

    pub(crate) fn hidden_initial(mut self) -> Self {
        self.hidden_initial = true;
        self
    }

    pub(crate) fn max_length(mut self, limit: usize) -> Self {
        self.max_length = Some(limit);
        self
    }

    fn text(raw: Option<&Value>) -> Option<String> {
        match raw {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}

impl FieldCapability for TextField {
    fn required(&self) -> bool {
        self.required
    }

    fn initial(&self) -> Option<Value> {
        self.initial.as_ref().map(|s| json!(s))
    }

    fn show_hidden_initial(&self) -> bool {
        self.hidden_initial
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn help_text(&self) -> Option<&str> {
        self.help_text.as_deref()
    }

    fn clean(&self, raw: Option<&Value>, _initial: Option<&Value>) -> CleanResult {
        match Self::text(raw) {
            Some(text) => {
                if let Some(limit) = self.max_length {
                    if text.chars().count() > limit {
                        return Err(ValidationError::new(format!(
                            "Ensure this value has at most {} characters.",
                            limit
                        )));
                    }
                }
                Ok(json!(text))
            }
            None if self.required => Err(ValidationError::new("This field is required.")),
            None => Ok(json!("")),
        }
    }

    fn has_changed(&self, initial: Option<&Value>, submitted: Option<&Value>) -> bool {
        // Absent, null, and "" are all the empty text value.
        let normalize = |v: Option<&Value>| Self::text(v).unwrap_or_default();
        normalize(initial) != normalize(submitted)
    }
}

/// Whole-number input parsed from a JSON number or numeric string.
#[derive(Clone, Default)]
pub(crate) struct IntegerField {
    required: bool,
    initial: Option<i64>,
}

impl IntegerField {
    pub(crate) fn new() -> Self {
        Self {
            required: true,
            initial: None,
        }
    }

    pub(crate) fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub(crate) fn initial(mut self, value: i64) -> Self {
        self.initial = Some(value);
        self
    }
}

impl FieldCapability for IntegerField {
    fn required(&self) -> bool {
        self.required
    }

    fn initial(&self) -> Option<Value> {
        self.initial.map(|n| json!(n))
    }

    fn clean(&self, raw: Option<&Value>, _initial: Option<&Value>) -> CleanResult {
        match raw {
            Some(Value::Number(n)) if n.is_i64() => Ok(json!(n.as_i64().unwrap())),
            Some(Value::String(s)) if !s.trim().is_empty() => match s.trim().parse::<i64>() {
                Ok(n) => Ok(json!(n)),
                Err(_) => Err(ValidationError::new("Enter a whole number.")),
            },
            None | Some(Value::Null) | Some(Value::String(_)) => {
                if self.required {
                    Err(ValidationError::new("This field is required."))
                } else {
                    Ok(Value::Null)
                }
            }
            Some(_) => Err(ValidationError::new("Enter a whole number.")),
        }
    }
}

/// Counts `clean` invocations; for memoization and concurrency assertions.
#[derive(Clone)]
pub(crate) struct CountingField {
    pub(crate) cleans: Arc<AtomicUsize>,
}

impl CountingField {
    pub(crate) fn new() -> Self {
        Self {
            cleans: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn count(&self) -> usize {
        self.cleans.load(Ordering::SeqCst)
    }
}

impl FieldCapability for CountingField {
    fn required(&self) -> bool {
        false
    }

    fn clean(&self, raw: Option<&Value>, _initial: Option<&Value>) -> CleanResult {
        self.cleans.fetch_add(1, Ordering::SeqCst);
        Ok(raw.cloned().unwrap_or(Value::Null))
    }
}

/// Binary-channel field: reads from the files bag and falls back to its
/// resolved initial when no upload arrives.
#[derive(Clone, Default)]
pub(crate) struct AttachmentField {
    required: bool,
}

impl AttachmentField {
    pub(crate) fn new() -> Self {
        Self { required: true }
    }
}

impl FieldCapability for AttachmentField {
    fn required(&self) -> bool {
        self.required
    }

    fn needs_binary_transport(&self) -> bool {
        true
    }

    fn extract_raw_value(&self, _data: &DataMap, files: &DataMap, name: &str) -> Option<Value> {
        files.get(name).cloned()
    }

    fn clean(&self, raw: Option<&Value>, initial: Option<&Value>) -> CleanResult {
        match raw {
            Some(value) if !value.is_null() => Ok(value.clone()),
            _ => match initial {
                Some(existing) => Ok(existing.clone()),
                None if self.required => Err(ValidationError::new("No file was submitted.")),
                None => Ok(Value::Null),
            },
        }
    }

    fn coerce_bound_value(&self, raw: Option<Value>, fallback: Option<Value>) -> Option<Value> {
        raw.or(fallback)
    }
}
