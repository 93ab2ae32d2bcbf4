//! Schema blueprint and its behavior surface

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::compose::FormComposer;
use crate::errors::{CleanResult, ValidationError};
use crate::field::{DataMap, FieldCapability};
use crate::form::instance::Form;
use crate::report::ErrorReport;

/// Cleaned values keyed by field name, in declaration order.
pub type CleanedData = IndexMap<String, Value>;

/// Per-field cleaning override, registered at compose time.
///
/// Runs after the field's own `clean` succeeds; its return value replaces
/// the field's cleaned value unconditionally.
pub type FieldCleaner = Arc<dyn Fn(CleaningState<'_>) -> CleanResult + Send + Sync>;

/// Form-wide cleaner. Consumes the accumulated cleaned data and returns the
/// full replacement set; a failure is recorded under the reserved non-field
/// key and the consumed data is discarded.
pub type FormCleaner =
    Arc<dyn Fn(CleanedData) -> Result<CleanedData, ValidationError> + Send + Sync>;

/// Unconditional extension point after per-field and form-wide cleaning.
pub type PostCleanHook = Arc<dyn Fn(&mut CleanedData, &mut ErrorReport) + Send + Sync>;

/// Rewrites construction arguments before base construction runs.
pub type PreInitHook = Arc<dyn Fn(BindArgs) -> BindArgs + Send + Sync>;

/// Mutates the freshly constructed instance, typically to add or remove
/// fields conditionally.
pub type PostInitHook = Arc<dyn Fn(&mut Form) + Send + Sync>;

/// What a per-field cleaner can see: the cleaned data accumulated so far
/// and the name of the field being cleaned.
pub struct CleaningState<'a> {
    cleaned: &'a CleanedData,
    name: &'a str,
}

impl<'a> CleaningState<'a> {
    pub(crate) fn new(cleaned: &'a CleanedData, name: &'a str) -> Self {
        Self { cleaned, name }
    }

    /// Name of the field being cleaned.
    pub fn name(&self) -> &str {
        self.name
    }

    /// The field's current cleaned value.
    pub fn value(&self) -> Option<&Value> {
        self.cleaned.get(self.name)
    }

    /// All cleaned values accumulated so far, in declaration order.
    pub fn cleaned(&self) -> &CleanedData {
        self.cleaned
    }
}

/// Construction arguments for a form instance.
///
/// An instance is bound iff `data` or `files` is supplied. Fields are public
/// so a pre-init hook can inspect and rewrite them.
#[derive(Clone, Default)]
pub struct BindArgs {
    /// Raw submitted values, keyed by effective external name.
    pub data: Option<DataMap>,
    /// Raw submitted binary payloads, keyed by effective external name.
    pub files: Option<DataMap>,
    /// Per-instance initial values, keyed by field name.
    pub initial: DataMap,
    /// Namespacing prefix applied to every field's external name.
    pub prefix: Option<String>,
    /// Overrides the schema's empty-permitted flag for this instance.
    pub empty_permitted: Option<bool>,
}

impl BindArgs {
    /// Arguments for an unbound instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply submitted data, making the instance bound.
    pub fn data(mut self, data: DataMap) -> Self {
        self.data = Some(data);
        self
    }

    /// Supply submitted binary payloads, making the instance bound.
    pub fn files(mut self, files: DataMap) -> Self {
        self.files = Some(files);
        self
    }

    /// Supply per-instance initial values.
    pub fn initial(mut self, initial: DataMap) -> Self {
        self.initial = initial;
        self
    }

    /// Namespace this instance's external field names.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Permit an empty (unchanged) submission to validate as empty-but-valid.
    pub fn empty_permitted(mut self, permitted: bool) -> Self {
        self.empty_permitted = Some(permitted);
        self
    }
}

/// Immutable schema blueprint: ordered field map plus behavior surface.
///
/// Produced by [`FormComposer`]; instantiation deep-copies the field map so
/// per-instance mutation never perturbs the blueprint or sibling instances.
#[derive(Clone)]
pub struct FormSchema {
    pub(crate) fields: IndexMap<String, Box<dyn FieldCapability>>,
    pub(crate) field_cleaners: HashMap<String, FieldCleaner>,
    pub(crate) form_cleaner: Option<FormCleaner>,
    pub(crate) post_clean: Option<PostCleanHook>,
    pub(crate) pre_init: Option<PreInitHook>,
    pub(crate) post_init: Option<PostInitHook>,
    pub(crate) empty_permitted: bool,
}

impl FormSchema {
    /// Start composing a new schema.
    pub fn compose() -> FormComposer {
        FormComposer::new()
    }

    /// Blueprint fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &dyn FieldCapability)> {
        self.fields
            .iter()
            .map(|(name, field)| (name.as_str(), field.as_ref()))
    }

    /// True iff the blueprint declares the field.
    pub fn contains_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Construct an unbound instance (defaults only, never validates).
    pub fn instance(&self) -> Form {
        self.bind_args(BindArgs::new())
    }

    /// Construct a bound instance from submitted data.
    pub fn bind(&self, data: DataMap) -> Form {
        self.bind_args(BindArgs::new().data(data))
    }

    /// Construct an instance with full control over binding arguments.
    ///
    /// Runs the pre-init hook over the arguments, deep-copies the field map
    /// into the instance, then runs the post-init hook on the fresh
    /// instance.
    pub fn bind_args(&self, args: BindArgs) -> Form {
        let args = match &self.pre_init {
            Some(pre_init) => pre_init(args),
            None => args,
        };
        let mut form = Form::from_schema(self, args);
        if let Some(post_init) = &self.post_init {
            post_init(&mut form);
        }
        form
    }
}
