//! Unified application error types for PressRoom.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested resource was not found.
    NotFound,
    /// Input validation failed.
    Validation,
    /// A conflict occurred (duplicate entry, concurrent modification, etc.).
    Conflict,
    /// An internal server error occurred.
    Internal,
    /// A database error occurred.
    Database,
    /// A storage I/O error occurred.
    Storage,
    /// A source image could not be located on disk. User-correctable:
    /// the edit is aborted with the original input preserved.
    SourceNotFound,
    /// A filesystem move/rename of an asset failed.
    MoveFailed,
    /// Scaled-variant generation failed (unreadable or unsupported image).
    Thumbnail,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Database => write!(f, "DATABASE"),
            Self::Storage => write!(f, "STORAGE"),
            Self::SourceNotFound => write!(f, "SOURCE_NOT_FOUND"),
            Self::MoveFailed => write!(f, "MOVE_FAILED"),
            Self::Thumbnail => write!(f, "THUMBNAIL"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
        }
    }
}

/// The unified application error used throughout PressRoom.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. Pipeline errors carry enough context
/// (the offending filename) for the caller to surface a user-visible,
/// actionable message; none are fatal to the host process.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a source-not-found error for the given original filename.
    pub fn source_not_found(filename: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::SourceNotFound,
            format!("Image not found to move: {filename}"),
        )
    }

    /// Create a move-failed error.
    pub fn move_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MoveFailed, message)
    }

    /// Create a thumbnail-generation error.
    pub fn thumbnail(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Thumbnail, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Whether this error aborts the enclosing edit but is correctable by
    /// the user (as opposed to an operational failure).
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::SourceNotFound | ErrorKind::Validation | ErrorKind::Conflict
        )
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display() {
        assert_eq!(ErrorKind::SourceNotFound.to_string(), "SOURCE_NOT_FOUND");
        assert_eq!(ErrorKind::MoveFailed.to_string(), "MOVE_FAILED");
    }

    #[test]
    fn test_source_not_found_carries_filename() {
        let err = AppError::source_not_found("photo.jpg");
        assert!(err.message.contains("photo.jpg"));
        assert!(err.is_user_correctable());
        assert!(!AppError::move_failed("boom").is_user_correctable());
    }
}
