//! formant - a strict, declarative data-validation and schema-composition engine
//!
//! Given a schema of named, typed fields and a bag of untyped input values,
//! formant produces either a cleaned, typed value per field or a structured,
//! field-keyed error report. Schemas compose from multiple parents plus
//! inline declarations with a well-defined, order-preserving override rule.

pub mod binding;
pub mod compose;
pub mod errors;
pub mod field;
pub mod form;
pub mod report;

#[cfg(test)]
pub(crate) mod testutil;
