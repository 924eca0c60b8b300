// src/error.rs - Error handling for the listing form core

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A field failed one or more validation rules. Recoverable by the
    /// merchant correcting input.
    Validation {
        field: Option<String>,
        rules: Vec<String>,
    },
    /// Raw option-value text could not be accepted (duplicate tokens etc.).
    Tokens { input: String },
    /// An option-dimension slot was addressed or configured incorrectly.
    Dimension {
        slot: Option<usize>,
        name: Option<String>,
    },
    /// A form-state operation was applied to a record that cannot accept it.
    State { operation: String },
    /// A remote lookup (taxonomy, brand, autofill) failed. Non-fatal; state
    /// is left unchanged and the merchant may retry.
    Lookup { endpoint: Option<String> },
    Serialization,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Error {
    pub id: Uuid,
    pub kind: ErrorKind,
    pub message: String,
    pub severity: ErrorSeverity,
    pub source: String,
    pub timestamp: DateTime<Utc>,
    pub metadata: crate::types::Metadata,
    pub causes: Vec<String>,
}

impl Error {
    /// Creates a new error with the specified kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            severity: ErrorSeverity::Medium,
            source: "unknown".to_string(),
            timestamp: Utc::now(),
            metadata: std::collections::HashMap::new(),
            causes: Vec::new(),
        }
    }

    /// Sets the error severity
    pub fn severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the error source
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Adds metadata to the error
    pub fn metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Adds a cause to the error chain
    pub fn caused_by(mut self, cause: impl fmt::Display) -> Self {
        self.causes.push(cause.to_string());
        self
    }

    /// Creates a validation error for a named field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::Validation {
                field: Some(field.into()),
                rules: Vec::new(),
            },
            message,
        )
        .severity(ErrorSeverity::Low)
    }

    /// Creates an error for rejected option-value input
    pub fn tokens(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::Tokens {
                input: input.into(),
            },
            message,
        )
        .severity(ErrorSeverity::Low)
    }

    /// Creates a dimension-slot error
    pub fn dimension(slot: usize, message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::Dimension {
                slot: Some(slot),
                name: None,
            },
            message,
        )
    }

    /// Creates a form-state operation error
    pub fn state(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::State {
                operation: operation.into(),
            },
            message,
        )
    }

    /// Creates a remote-lookup error
    pub fn lookup(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::Lookup {
                endpoint: Some(endpoint.into()),
            },
            message,
        )
        .severity(ErrorSeverity::Medium)
    }

    /// Whether this error only blocks the current field rather than the form
    pub fn is_field_level(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Validation { .. } | ErrorKind::Tokens { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}): {}",
            self.severity, self.source, self.id, self.message
        )
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        let mut error = Error::new(ErrorKind::Serialization, err.to_string());
        error.source = "serde_json".to_string();
        error.severity = ErrorSeverity::High;
        error
    }
}

/// Extension trait for Results to add context
pub trait ResultExt<T> {
    /// Adds context to an error
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Sets the error source
    fn with_source(self, source: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            Error::new(
                ErrorKind::State {
                    operation: "context".to_string(),
                },
                f(),
            )
            .caused_by(e)
        })
    }

    fn with_source(self, source: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            Error::new(
                ErrorKind::State {
                    operation: "context".to_string(),
                },
                e.to_string(),
            )
            .source(source)
            .caused_by(e)
        })
    }
}
