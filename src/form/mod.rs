//! Form subsystem
//!
//! A [`FormSchema`] is the immutable blueprint produced by composition: an
//! ordered field map plus the schema's behavior surface (cleaning hooks and
//! construction hooks). Instantiating it yields a [`Form`], which owns a
//! deep copy of the field map together with the bound input, and computes
//! its validation outcome and changed-field set lazily, at most once.
//!
//! # Design principles
//!
//! - Validation is deterministic and bounded; no suspension points.
//! - One instance, one pipeline run; re-validation means a new instance.
//! - Per-field failures never abort cleaning of sibling fields.
//! - Instances never share mutable state with the blueprint or each other.

mod changes;
mod instance;
mod pipeline;
mod schema;

pub use instance::Form;
pub use schema::{
    BindArgs, CleanedData, CleaningState, FieldCleaner, FormCleaner, FormSchema, PostCleanHook,
    PostInitHook, PreInitHook,
};
