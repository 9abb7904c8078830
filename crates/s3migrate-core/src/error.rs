//! Error types for the s3migrate core.

/// Core error type for configuration and identifier validation.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Invalid AWS account ID format.
    #[error("invalid AWS account ID: {0} (must be 12-digit numeric string)")]
    InvalidAccountId(String),

    /// A required setting is absent or empty.
    #[error("{name} missing from env")]
    MissingSetting {
        /// Environment variable name of the setting.
        name: &'static str,
    },
}

/// Convenience result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
