//! Policy model error types.

/// Errors raised while reading, writing, or transforming a policy document.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// The policy text is not a well-formed policy document.
    #[error("malformed bucket policy: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The policy document could not be serialized.
    #[error("failed to serialize bucket policy: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A rename was requested with an empty replacement bucket name.
    #[error("cannot rename policy resources to an empty bucket name")]
    EmptyDocument,
}

/// Convenience result type for policy operations.
pub type PolicyResult<T> = Result<T, PolicyError>;
