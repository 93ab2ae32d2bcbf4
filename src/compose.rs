//! Schema composition
//!
//! Builds a [`FormSchema`] from zero or more parent schemas (ordered
//! capability mixins), inline field declarations, and hook registrations.
//!
//! # Merge rules
//!
//! - Field maps merge by insertion: the first occurrence of a name fixes
//!   its position; a later occurrence replaces the capability in place.
//!   Parents contribute first, in listed order, then inline declarations in
//!   builder-call order.
//! - Behavior (field cleaners, form cleaner, post-clean, pre/post-init)
//!   merges later-listed-source-wins; a parent without a given hook never
//!   erases an earlier parent's.
//! - Per-field cleaners are an explicit name-keyed registration, resolved
//!   here at compose time.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::debug;

use crate::errors::{CleanResult, ComposeError, ComposeResult, ValidationError};
use crate::field::FieldCapability;
use crate::form::{
    BindArgs, CleanedData, CleaningState, FieldCleaner, Form, FormCleaner, FormSchema,
    PostCleanHook, PostInitHook, PreInitHook,
};
use crate::report::{ErrorReport, NON_FIELD_ERRORS};

/// Builder for a composed schema. Obtain via [`FormSchema::compose`].
#[derive(Default)]
pub struct FormComposer {
    parents: Vec<FormSchema>,
    fields: Vec<(String, Box<dyn FieldCapability>)>,
    field_cleaners: Vec<(String, FieldCleaner)>,
    form_cleaner: Option<FormCleaner>,
    post_clean: Option<PostCleanHook>,
    pre_init: Option<PreInitHook>,
    post_init: Option<PostInitHook>,
    empty_permitted: Option<bool>,
}

impl FormComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a parent schema in. Parents are processed in listed order.
    pub fn parent(mut self, parent: &FormSchema) -> Self {
        self.parents.push(parent.clone());
        self
    }

    /// Declare an inline field. Declaration order is builder-call order.
    pub fn field(
        mut self,
        name: impl Into<String>,
        capability: impl FieldCapability + 'static,
    ) -> Self {
        self.fields.push((name.into(), Box::new(capability)));
        self
    }

    /// Register a cleaning override for a field.
    ///
    /// The override runs after the field's own `clean` succeeds and its
    /// return value replaces the cleaned value unconditionally. The name
    /// need not be composed here; a field added per-instance by a post-init
    /// hook picks its cleaner up by name.
    pub fn clean_field<F>(mut self, name: impl Into<String>, cleaner: F) -> Self
    where
        F: Fn(CleaningState<'_>) -> CleanResult + Send + Sync + 'static,
    {
        self.field_cleaners
            .push((name.into(), std::sync::Arc::new(cleaner)));
        self
    }

    /// Register the form-wide cleaner.
    pub fn clean_form<F>(mut self, cleaner: F) -> Self
    where
        F: Fn(CleanedData) -> Result<CleanedData, ValidationError> + Send + Sync + 'static,
    {
        self.form_cleaner = Some(std::sync::Arc::new(cleaner));
        self
    }

    /// Register the post-clean extension point.
    pub fn post_clean<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut CleanedData, &mut ErrorReport) + Send + Sync + 'static,
    {
        self.post_clean = Some(std::sync::Arc::new(hook));
        self
    }

    /// Register a hook that rewrites binding arguments before construction.
    pub fn pre_init<F>(mut self, hook: F) -> Self
    where
        F: Fn(BindArgs) -> BindArgs + Send + Sync + 'static,
    {
        self.pre_init = Some(std::sync::Arc::new(hook));
        self
    }

    /// Register a hook that mutates each freshly constructed instance.
    pub fn post_init<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Form) + Send + Sync + 'static,
    {
        self.post_init = Some(std::sync::Arc::new(hook));
        self
    }

    /// Let unchanged submissions validate as empty-but-valid by default.
    pub fn empty_permitted(mut self, permitted: bool) -> Self {
        self.empty_permitted = Some(permitted);
        self
    }

    /// Merge parents, inline declarations, and hooks into a schema.
    pub fn compose(self) -> ComposeResult<FormSchema> {
        for (name, _) in &self.fields {
            validate_field_name(name)?;
        }

        let mut fields: IndexMap<String, Box<dyn FieldCapability>> = IndexMap::new();
        let mut field_cleaners: HashMap<String, FieldCleaner> = HashMap::new();
        let mut form_cleaner = None;
        let mut post_clean = None;
        let mut pre_init = None;
        let mut post_init = None;
        let mut empty_permitted = false;

        for parent in &self.parents {
            for (name, capability) in &parent.fields {
                fields.insert(name.clone(), capability.clone());
            }
            for (name, cleaner) in &parent.field_cleaners {
                field_cleaners.insert(name.clone(), cleaner.clone());
            }
            if parent.form_cleaner.is_some() {
                form_cleaner = parent.form_cleaner.clone();
            }
            if parent.post_clean.is_some() {
                post_clean = parent.post_clean.clone();
            }
            if parent.pre_init.is_some() {
                pre_init = parent.pre_init.clone();
            }
            if parent.post_init.is_some() {
                post_init = parent.post_init.clone();
            }
            empty_permitted = parent.empty_permitted;
        }

        for (name, capability) in self.fields {
            fields.insert(name, capability);
        }
        for (name, cleaner) in self.field_cleaners {
            field_cleaners.insert(name, cleaner);
        }
        if self.form_cleaner.is_some() {
            form_cleaner = self.form_cleaner;
        }
        if self.post_clean.is_some() {
            post_clean = self.post_clean;
        }
        if self.pre_init.is_some() {
            pre_init = self.pre_init;
        }
        if self.post_init.is_some() {
            post_init = self.post_init;
        }
        if let Some(permitted) = self.empty_permitted {
            empty_permitted = permitted;
        }

        debug!("composed schema with {} field(s)", fields.len());
        Ok(FormSchema {
            fields,
            field_cleaners,
            form_cleaner,
            post_clean,
            pre_init,
            post_init,
            empty_permitted,
        })
    }
}

fn validate_field_name(name: &str) -> ComposeResult<()> {
    if name.is_empty() {
        return Err(ComposeError::EmptyFieldName);
    }
    if name == NON_FIELD_ERRORS {
        return Err(ComposeError::ReservedFieldName(name.to_string()));
    }
    Ok(())
}
