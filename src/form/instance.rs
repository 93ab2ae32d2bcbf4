//! Form instance: bound state and lazy derived data

use std::collections::HashMap;

use indexmap::IndexMap;
use once_cell::sync::OnceCell;

use crate::binding::BoundField;
use crate::field::{DataMap, FieldCapability};
use crate::form::changes;
use crate::form::pipeline;
use crate::form::schema::{
    BindArgs, CleanedData, FieldCleaner, FormCleaner, FormSchema, PostCleanHook,
};
use crate::report::ErrorReport;

/// Outcome of one pipeline run, stored once per instance.
pub(crate) struct Validated {
    pub(crate) report: ErrorReport,
    pub(crate) cleaned: Option<CleanedData>,
}

/// A schema instance, bound (or not) to a concrete input payload.
///
/// Owns a deep copy of the composed field map; `data`, `files`, `initial`,
/// and `prefix` are immutable for the instance's lifetime. The validation
/// outcome and the changed-field set are computed lazily, at most once, and
/// first access from concurrent threads converges on a single computation.
pub struct Form {
    fields: IndexMap<String, Box<dyn FieldCapability>>,
    field_cleaners: HashMap<String, FieldCleaner>,
    form_cleaner: Option<FormCleaner>,
    post_clean: Option<PostCleanHook>,
    is_bound: bool,
    data: DataMap,
    files: DataMap,
    initial: DataMap,
    prefix: Option<String>,
    empty_permitted: bool,
    validated: OnceCell<Validated>,
    changed: OnceCell<Vec<String>>,
}

impl Form {
    pub(crate) fn from_schema(schema: &FormSchema, args: BindArgs) -> Self {
        let is_bound = args.data.is_some() || args.files.is_some();
        Self {
            fields: schema.fields.clone(),
            field_cleaners: schema.field_cleaners.clone(),
            form_cleaner: schema.form_cleaner.clone(),
            post_clean: schema.post_clean.clone(),
            is_bound,
            data: args.data.unwrap_or_default(),
            files: args.files.unwrap_or_default(),
            initial: args.initial,
            prefix: args.prefix,
            empty_permitted: args.empty_permitted.unwrap_or(schema.empty_permitted),
            validated: OnceCell::new(),
            changed: OnceCell::new(),
        }
    }

    /// True iff input data or files were supplied at construction.
    pub fn is_bound(&self) -> bool {
        self.is_bound
    }

    /// Raw submitted values.
    pub fn data(&self) -> &DataMap {
        &self.data
    }

    /// Raw submitted binary payloads.
    pub fn files(&self) -> &DataMap {
        &self.files
    }

    /// Per-instance initial values.
    pub fn initial(&self) -> &DataMap {
        &self.initial
    }

    /// Namespacing prefix, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Whether an unchanged submission validates as empty-but-valid.
    pub fn empty_permitted(&self) -> bool {
        self.empty_permitted
    }

    /// Effective external name for a field of this instance.
    pub fn add_prefix(&self, name: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}-{}", prefix, name),
            None => name.to_string(),
        }
    }

    /// Effective external name of a field's shadow "initial" channel.
    pub fn add_initial_prefix(&self, name: &str) -> String {
        format!("initial-{}", self.add_prefix(name))
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &dyn FieldCapability)> {
        self.fields
            .iter()
            .map(|(name, field)| (name.as_str(), field.as_ref()))
    }

    /// Fields in declaration order, filtered by a predicate.
    pub fn fields_where<'a, P>(
        &'a self,
        predicate: P,
    ) -> impl Iterator<Item = (&'a str, &'a dyn FieldCapability)>
    where
        P: Fn(&str, &dyn FieldCapability) -> bool + 'a,
    {
        self.fields()
            .filter(move |&(name, field)| predicate(name, field))
    }

    /// Bound view of a single field, for presentation layers.
    pub fn bound_field(&self, name: &str) -> Option<BoundField<'_>> {
        let (_, key, field) = self.fields.get_full(name)?;
        Some(BoundField::new(self, key.as_str(), field.as_ref()))
    }

    /// Add a field to this instance only. Intended for post-init hooks; the
    /// blueprint and sibling instances are unaffected.
    pub fn add_field(&mut self, name: impl Into<String>, capability: impl FieldCapability + 'static) {
        self.fields.insert(name.into(), Box::new(capability));
    }

    /// Remove a field from this instance only, preserving the order of the
    /// remaining fields.
    pub fn remove_field(&mut self, name: &str) -> Option<Box<dyn FieldCapability>> {
        self.fields.shift_remove(name)
    }

    /// True iff any field's input arrives on a binary/multi-part channel.
    pub fn is_multipart(&self) -> bool {
        self.fields.values().any(|field| field.needs_binary_transport())
    }

    /// The error report, running the pipeline on first access.
    pub fn errors(&self) -> &ErrorReport {
        &self.validated().report
    }

    /// Cleaned values, present iff validation ran and produced zero errors.
    pub fn cleaned_data(&self) -> Option<&CleanedData> {
        self.validated().cleaned.as_ref()
    }

    /// False if unbound; otherwise true iff the report is not populated.
    pub fn is_valid(&self) -> bool {
        self.is_bound && !self.errors().is_populated()
    }

    /// Messages recorded under the reserved non-field key.
    pub fn non_field_errors(&self) -> &[String] {
        self.errors().non_field_errors()
    }

    /// Names of fields whose submitted value differs from their baseline,
    /// in declaration order. Memoized per instance.
    pub fn changed_data(&self) -> &[String] {
        self.changed.get_or_init(|| changes::changed_data(self))
    }

    /// True iff any field changed.
    pub fn has_changed(&self) -> bool {
        !self.changed_data().is_empty()
    }

    fn validated(&self) -> &Validated {
        self.validated.get_or_init(|| pipeline::full_clean(self))
    }

    pub(crate) fn field_cleaner(&self, name: &str) -> Option<&FieldCleaner> {
        self.field_cleaners.get(name)
    }

    pub(crate) fn form_cleaner(&self) -> Option<&FormCleaner> {
        self.form_cleaner.as_ref()
    }

    pub(crate) fn post_clean_hook(&self) -> Option<&PostCleanHook> {
        self.post_clean.as_ref()
    }
}
