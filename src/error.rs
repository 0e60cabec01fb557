//! # Error Types
//!
//! This module defines error types used throughout the lucero library.

use std::fmt;
use thiserror::Error;

/// A single invalid form field, reported at form-field granularity so the
/// UI can surface each violation next to its input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    /// Form field name (e.g. "scale", "lightColor").
    pub field: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validation failure for a raw form payload.
///
/// Never collapses to a single opaque failure: every invalid field is
/// reported individually.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the messages recorded for a given field, if any.
    pub fn field(&self, name: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == name)
            .map(|e| e.message.as_str())
            .collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid form: ")?;
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Main error type for render and export operations.
#[derive(Debug, Error)]
pub enum LuceroError {
    /// Form values failed validation (per-field, recoverable).
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The content/parameter combination cannot be encoded.
    /// Deterministic function of input; never retried.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The logo image could not be decoded. The module matrix remains
    /// drawn; only the logo overlay is omitted.
    #[error("Logo decode error: {0}")]
    LogoDecode(String),

    /// Export was requested before any successful render.
    #[error("No completed render to export")]
    NotReady,

    /// Image serialization error
    #[error("Image error: {0}")]
    Image(String),

    /// Invalid command or parameter
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
