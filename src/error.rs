//! Error handling module for renderprep
//!
//! Provides centralized error handling with proper error types using thiserror.
//! All errors in the library should use these types for consistency.

use thiserror::Error;

/// Main error type for renderprep
#[derive(Error, Debug)]
pub enum RenderPrepError {
    /// IO errors (job file access, probe filesystem reads)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Job document errors (loading, saving, malformed structure)
    #[error("Job document error: {0}")]
    Document(String),

    /// Validation errors (inconsistent or out-of-range document values)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Device probe errors (unreadable driver interfaces)
    #[error("Device probe error: {0}")]
    Probe(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for renderprep operations
pub type Result<T> = std::result::Result<T, RenderPrepError>;

// Convenient error constructors
impl RenderPrepError {
    /// Create a job document error
    pub fn document(msg: impl Into<String>) -> Self {
        Self::Document(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a device probe error
    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe(msg.into())
    }
}
