//! Error types for validation and schema composition
//!
//! Only one error kind crosses the cleaning pipeline as a recoverable
//! condition: a validation failure carrying one or more human-readable
//! messages. Everything else is a programming defect and propagates as a
//! panic, never caught by the pipeline.

use thiserror::Error;

/// Result of cleaning a single value.
pub type CleanResult<T = serde_json::Value> = Result<T, ValidationError>;

/// Result type for schema composition.
pub type ComposeResult<T> = Result<T, ComposeError>;

/// A recoverable validation failure.
///
/// Carries one or more messages attributable either to a single field or to
/// the form as a whole; the recording site decides which. Always holds at
/// least one message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .messages.join("; "))]
pub struct ValidationError {
    messages: Vec<String>,
}

impl ValidationError {
    /// Create a validation error with a single message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }

    /// Create a validation error with multiple messages.
    ///
    /// # Panics
    ///
    /// Panics if `messages` is empty. An error without a message is a
    /// programming defect, not a validation outcome.
    pub fn with_messages(messages: Vec<String>) -> Self {
        assert!(
            !messages.is_empty(),
            "a validation error must carry at least one message"
        );
        Self { messages }
    }

    /// Returns the messages carried by this error.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Consumes the error, returning its messages.
    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

/// Rejection of malformed composition input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    /// A field was declared with an empty name.
    #[error("field name cannot be empty")]
    EmptyFieldName,

    /// A field was declared under the reserved non-field error key.
    #[error("field name '{0}' collides with the reserved non-field error key")]
    ReservedFieldName(String),
}
