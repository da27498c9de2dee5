//! Error types for the Options Builder.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptionsError {
    /// The SDK would reject an emitted field; propagated as a fatal build
    /// error carrying the offending field name.
    #[error("agent SDK rejected option field '{field}': {reason}")]
    RejectedField { field: String, reason: String },
}

pub type Result<T> = std::result::Result<T, OptionsError>;
