//! Field capability contract
//!
//! The engine treats a field as an opaque capability: something that can
//! extract its raw value from an input bag, clean it, report whether it
//! changed against a baseline, and describe itself. Concrete field types
//! (text, number, file, choice) live outside this crate and plug in through
//! [`FieldCapability`].
//!
//! A field's identity within a schema is the name it is declared under; the
//! capability itself carries no name.

use serde_json::Value;

use crate::errors::CleanResult;

/// Raw external input keyed by (possibly prefixed) field name.
pub type DataMap = serde_json::Map<String, Value>;

/// The contract a pluggable field type must satisfy.
///
/// `clean` must be pure with respect to the field's own declared rules and
/// must not depend on sibling fields; cross-field logic belongs to the
/// schema's form-wide cleaner.
pub trait FieldCapability: CapabilityClone + Send + Sync {
    /// Whether a value must be supplied for this field.
    fn required(&self) -> bool {
        true
    }

    /// The field's own default value, lower priority than a per-instance
    /// initial. Computed per call, so dynamic defaults resolve at read time.
    fn initial(&self) -> Option<Value> {
        None
    }

    /// Whether this field echoes its starting value back through a parallel
    /// hidden input, read out of submitted data for change detection.
    fn show_hidden_initial(&self) -> bool {
        false
    }

    /// Whether this field's input arrives on a binary/multi-part channel.
    fn needs_binary_transport(&self) -> bool {
        false
    }

    /// Explicit display label, if the field declares one.
    fn label(&self) -> Option<&str> {
        None
    }

    /// Help text for presentation layers.
    fn help_text(&self) -> Option<&str> {
        None
    }

    /// Whether presentation layers should classify this field as hidden.
    fn is_hidden(&self) -> bool {
        false
    }

    /// Extract the field's raw value from the input bags under its effective
    /// external name.
    fn extract_raw_value(&self, data: &DataMap, _files: &DataMap, name: &str) -> Option<Value> {
        data.get(name).cloned()
    }

    /// Clean and validate a raw value.
    ///
    /// Fields whose input arrives on a binary channel additionally receive
    /// their resolved initial value, letting an absent upload fall back to
    /// the existing one.
    fn clean(&self, raw: Option<&Value>, initial: Option<&Value>) -> CleanResult;

    /// Coerce a raw value for re-display of a bound instance.
    fn coerce_bound_value(&self, raw: Option<Value>, _fallback: Option<Value>) -> Option<Value> {
        raw
    }

    /// Whether the submitted value differs from the baseline.
    ///
    /// The default predicate unifies an absent value with JSON `null` and
    /// otherwise compares structurally.
    fn has_changed(&self, initial: Option<&Value>, submitted: Option<&Value>) -> bool {
        match (initial, submitted) {
            (None, None) => false,
            (Some(a), Some(b)) => a != b,
            (Some(v), None) | (None, Some(v)) => !v.is_null(),
        }
    }
}

/// Clone plumbing for boxed capabilities, so a schema's field map can be
/// deep-copied into each instance.
pub trait CapabilityClone {
    /// Clone this capability into a fresh box.
    fn clone_capability(&self) -> Box<dyn FieldCapability>;
}

impl<T> CapabilityClone for T
where
    T: FieldCapability + Clone + 'static,
{
    fn clone_capability(&self) -> Box<dyn FieldCapability> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn FieldCapability> {
    fn clone(&self) -> Self {
        self.clone_capability()
    }
}
