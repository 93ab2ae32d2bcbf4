//! Change detection
//!
//! Compares each field's submitted raw value against its baseline using the
//! field's own predicate. The baseline is the resolved initial value, except
//! for fields that echo their starting value through a shadow "initial"
//! channel, where the baseline is read back out of the submitted data.

use log::trace;

use crate::binding;
use crate::form::instance::Form;

/// Names of changed fields, in declaration order.
pub(crate) fn changed_data(form: &Form) -> Vec<String> {
    let mut changed = Vec::new();
    for (name, field) in form.fields() {
        let submitted = binding::raw_value(form, name, field);
        let baseline = if field.show_hidden_initial() {
            field.extract_raw_value(form.data(), form.files(), &form.add_initial_prefix(name))
        } else {
            binding::resolved_initial(form, name, field)
        };
        if field.has_changed(baseline.as_ref(), submitted.as_ref()) {
            changed.push(name.to_string());
        }
    }
    trace!("changed fields: {:?}", changed);
    changed
}
