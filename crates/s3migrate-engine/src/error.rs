//! Engine error types.
//!
//! [`StorageError`] is raised by [`crate::store::BucketStore`]
//! implementations for any remote failure they do not map to an outcome.
//! [`MigrationError`] is what the orchestrator surfaces: a pre-flight
//! configuration problem, an unreadable policy, or a failed step.

use std::fmt;

use s3migrate_core::CoreError;
use s3migrate_model::PolicyError;

/// Errors raised by the storage collaborator.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The storage service rejected or failed the call.
    #[error("{operation} on {target} failed: {message}")]
    Remote {
        /// API operation name, e.g. `PutBucketPolicy`.
        operation: &'static str,
        /// Bucket (or profile, for account-level calls) the call targeted.
        target: String,
        /// Service error code, when the service returned one.
        code: Option<String>,
        /// Human-readable cause.
        message: String,
    },

    /// The named credential profile could not be used.
    #[error("profile {profile} is not usable: {message}")]
    Profile {
        /// Profile name.
        profile: String,
        /// Reason the profile was rejected.
        message: String,
    },

    /// A write payload could not be turned into a request.
    #[error("invalid {operation} request: {message}")]
    InvalidRequest {
        /// API operation name.
        operation: &'static str,
        /// What was missing or malformed.
        message: String,
    },
}

impl StorageError {
    /// The service error code, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Remote { code, .. } => code.as_deref(),
            Self::Profile { .. } | Self::InvalidRequest { .. } => None,
        }
    }
}

/// Convenience result type for storage calls.
pub type StorageResult<T> = Result<T, StorageError>;

/// The remote steps of a migration, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationStep {
    /// Read the source bucket policy.
    FetchSourcePolicy,
    /// Create the destination bucket.
    CreateDestinationBucket,
    /// Write the renamed policy onto the destination bucket.
    WriteDestinationPolicy,
    /// Write the delegating policy back onto the source bucket.
    WriteSourcePolicy,
    /// Read the source website configuration.
    FetchSourceWebsite,
    /// Write the website configuration onto the destination bucket.
    WriteDestinationWebsite,
}

impl MigrationStep {
    /// Stable kebab-case name of the step.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FetchSourcePolicy => "fetch-source-policy",
            Self::CreateDestinationBucket => "create-destination-bucket",
            Self::WriteDestinationPolicy => "write-destination-policy",
            Self::WriteSourcePolicy => "write-source-policy",
            Self::FetchSourceWebsite => "fetch-source-website",
            Self::WriteDestinationWebsite => "write-destination-website",
        }
    }
}

impl fmt::Display for MigrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by the migration orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// A required setting is missing or invalid; raised before any remote call.
    #[error("configuration error: {0}")]
    Configuration(#[from] CoreError),

    /// The source policy could not be parsed or transformed.
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// A remote step failed; earlier steps' effects remain in place.
    #[error("step {step} failed: {source}")]
    Step {
        /// The step that failed.
        step: MigrationStep,
        /// The underlying storage failure.
        source: StorageError,
        /// Notices raised by the steps that completed before the failure.
        notices: Vec<String>,
    },
}

impl MigrationError {
    /// The failed step, for [`MigrationError::Step`].
    #[must_use]
    pub fn step(&self) -> Option<MigrationStep> {
        match self {
            Self::Step { step, .. } => Some(*step),
            Self::Configuration(_) | Self::Policy(_) => None,
        }
    }

    /// Notices raised before the failure; empty unless a remote step failed.
    #[must_use]
    pub fn notices(&self) -> &[String] {
        match self {
            Self::Step { notices, .. } => notices,
            Self::Configuration(_) | Self::Policy(_) => &[],
        }
    }

    /// Attach the notices gathered so far to a failed step.
    #[must_use]
    pub fn with_notices(self, gathered: Vec<String>) -> Self {
        match self {
            Self::Step { step, source, .. } => Self::Step {
                step,
                source,
                notices: gathered,
            },
            other => other,
        }
    }
}

/// Convenience result type for migrations.
pub type MigrationResult<T> = Result<T, MigrationError>;
