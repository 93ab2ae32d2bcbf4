//! Bound value resolution and the per-field boundary view
//!
//! Stateless helpers that resolve a field's effective external name, raw
//! value, and display value from a form instance's bound state. Pure
//! functions of instance state at call time; the instance's input bags are
//! immutable after construction, so callers may cache results if they wish.

use serde_json::Value;

use crate::field::FieldCapability;
use crate::form::Form;

/// Raw submitted value for a field, extracted under its effective name.
pub(crate) fn raw_value(form: &Form, name: &str, field: &dyn FieldCapability) -> Option<Value> {
    field.extract_raw_value(form.data(), form.files(), &form.add_prefix(name))
}

/// Initial value for a field: the per-instance entry, else the field's own.
pub(crate) fn resolved_initial(
    form: &Form,
    name: &str,
    field: &dyn FieldCapability,
) -> Option<Value> {
    form.initial().get(name).cloned().or_else(|| field.initial())
}

/// Value to display for a field.
///
/// Unbound instances resolve to the initial value; bound instances coerce
/// the raw value with the initial as fallback.
pub(crate) fn resolved_value(form: &Form, name: &str, field: &dyn FieldCapability) -> Option<Value> {
    let fallback = resolved_initial(form, name, field);
    if form.is_bound() {
        field.coerce_bound_value(raw_value(form, name, field), fallback)
    } else {
        fallback
    }
}

/// Derive a display label from a field identifier: word separators become
/// spaces and the first letter is capitalized.
pub fn pretty_name(name: &str) -> String {
    let spaced = name.replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// A single field of a form instance, as seen by presentation layers.
///
/// Exposes the field's effective external names, computed label, error
/// slice, and resolved value. Reading [`errors`](Self::errors) triggers the
/// owning instance's validation if it has not run yet.
pub struct BoundField<'a> {
    form: &'a Form,
    name: &'a str,
    field: &'a dyn FieldCapability,
}

impl<'a> BoundField<'a> {
    pub(crate) fn new(form: &'a Form, name: &'a str, field: &'a dyn FieldCapability) -> Self {
        Self { form, name, field }
    }

    /// The field's name within its schema.
    pub fn name(&self) -> &str {
        self.name
    }

    /// The capability backing this field.
    pub fn field(&self) -> &dyn FieldCapability {
        self.field
    }

    /// Effective external name, with the instance prefix applied.
    pub fn html_name(&self) -> String {
        self.form.add_prefix(self.name)
    }

    /// Effective external name of the shadow "initial" channel.
    pub fn html_initial_name(&self) -> String {
        self.form.add_initial_prefix(self.name)
    }

    /// The field's explicit label, or one humanized from its identifier.
    pub fn label(&self) -> String {
        match self.field.label() {
            Some(label) => label.to_string(),
            None => pretty_name(self.name),
        }
    }

    /// Help text declared by the field, if any.
    pub fn help_text(&self) -> Option<&'a str> {
        self.field.help_text()
    }

    /// Whether presentation layers should hide this field.
    pub fn is_hidden(&self) -> bool {
        self.field.is_hidden()
    }

    /// This field's slice of the error report.
    pub fn errors(&self) -> &'a [String] {
        self.form.errors().field_errors(self.name)
    }

    /// The value to display for this field.
    pub fn value(&self) -> Option<Value> {
        resolved_value(self.form, self.name, self.field)
    }
}
