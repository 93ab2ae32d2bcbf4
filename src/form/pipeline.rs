//! Validation pipeline
//!
//! Runs once per instance, lazily, on first read of errors or cleaned data:
//!
//! 1. Unbound instances stop immediately: empty report, no cleaned data.
//! 2. An empty-permitted instance with no changed fields stops with an
//!    empty-but-valid result.
//! 3. Per-field cleaning in declaration order; a registered field cleaner's
//!    return value replaces the cleaned value unconditionally.
//! 4. Form-wide cleaner returns the full replacement set; its failure is
//!    recorded under the reserved non-field key.
//! 5. Post-clean hook runs unconditionally.
//! 6. A populated report discards the cleaned data entirely.
//!
//! Only [`ValidationError`](crate::errors::ValidationError) is recovered;
//! any other failure propagates as a panic.

use log::debug;

use crate::binding;
use crate::form::instance::{Form, Validated};
use crate::form::schema::{CleanedData, CleaningState};
use crate::report::{ErrorReport, NON_FIELD_ERRORS};

pub(crate) fn full_clean(form: &Form) -> Validated {
    let mut report = ErrorReport::new();
    if !form.is_bound() {
        return Validated {
            report,
            cleaned: None,
        };
    }
    if form.empty_permitted() && !form.has_changed() {
        debug!("empty submission permitted and nothing changed; skipping cleaning");
        return Validated {
            report,
            cleaned: Some(CleanedData::new()),
        };
    }

    let mut cleaned = clean_fields(form, &mut report);
    cleaned = clean_form(form, cleaned, &mut report);
    if let Some(hook) = form.post_clean_hook() {
        hook(&mut cleaned, &mut report);
    }

    debug!(
        "full_clean finished with {} error key(s) across {} field(s)",
        report.len(),
        form.fields().count()
    );
    let cleaned = if report.is_populated() {
        None
    } else {
        Some(cleaned)
    };
    Validated { report, cleaned }
}

/// Clean every field in declaration order. One field's failure never aborts
/// cleaning of the others.
fn clean_fields(form: &Form, report: &mut ErrorReport) -> CleanedData {
    let mut cleaned = CleanedData::new();
    for (name, field) in form.fields() {
        let raw = binding::raw_value(form, name, field);
        let initial = if field.needs_binary_transport() {
            binding::resolved_initial(form, name, field)
        } else {
            None
        };
        match field.clean(raw.as_ref(), initial.as_ref()) {
            Ok(value) => {
                cleaned.insert(name.to_string(), value);
                if let Some(cleaner) = form.field_cleaner(name) {
                    let outcome = cleaner(CleaningState::new(&cleaned, name));
                    match outcome {
                        Ok(value) => {
                            cleaned.insert(name.to_string(), value);
                        }
                        Err(error) => {
                            report.add(name, error);
                            cleaned.shift_remove(name);
                        }
                    }
                }
            }
            Err(error) => {
                report.add(name, error);
                cleaned.shift_remove(name);
            }
        }
    }
    cleaned
}

/// Apply the form-wide cleaner, if one is registered. The cleaner consumes
/// the accumulated data and returns the full replacement set; on failure the
/// consumed data is discarded, not merged.
fn clean_form(form: &Form, cleaned: CleanedData, report: &mut ErrorReport) -> CleanedData {
    match form.form_cleaner() {
        Some(cleaner) => match cleaner(cleaned) {
            Ok(replacement) => replacement,
            Err(error) => {
                report.add(NON_FIELD_ERRORS, error);
                CleanedData::new()
            }
        },
        None => cleaned,
    }
}
