//! Storage collaborator interface.
//!
//! [`BucketStore`] is the seam between the orchestrator and the remote
//! storage API. Every call names the credential profile it runs under;
//! "not found" answers for policies and website configurations are ordinary
//! `None` results, and the three tolerated bucket-creation conditions are
//! reported as [`CreateBucketOutcome`] values rather than errors.

use async_trait::async_trait;
use s3migrate_core::ProfileName;
use s3migrate_model::{WebsiteConfig, WebsiteWriteRequest};

use crate::error::StorageResult;

/// Result of a bucket creation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateBucketOutcome {
    /// The bucket was created.
    Created,
    /// The caller already owns a bucket with this name.
    AlreadyOwnedByCaller,
    /// The name is taken by another account.
    AlreadyExists,
    /// A conflicting operation is in progress, typically a recent deletion.
    OperationAborted {
        /// Message returned by the service.
        message: String,
    },
}

/// Remote bucket operations used by a migration.
#[async_trait]
pub trait BucketStore: Send + Sync {
    /// Names of all buckets visible to the profile.
    async fn list_buckets(&self, profile: &ProfileName) -> StorageResult<Vec<String>>;

    /// The bucket policy JSON, or `None` when the bucket has no policy.
    async fn get_bucket_policy(
        &self,
        bucket: &str,
        profile: &ProfileName,
    ) -> StorageResult<Option<String>>;

    /// Replace the bucket policy.
    async fn put_bucket_policy(
        &self,
        bucket: &str,
        profile: &ProfileName,
        policy: &str,
    ) -> StorageResult<()>;

    /// Create a bucket in the profile's account and region.
    async fn create_bucket(
        &self,
        bucket: &str,
        profile: &ProfileName,
    ) -> StorageResult<CreateBucketOutcome>;

    /// The website configuration, or `None` when the bucket has none.
    async fn get_bucket_website(
        &self,
        bucket: &str,
        profile: &ProfileName,
    ) -> StorageResult<Option<WebsiteConfig>>;

    /// Write a website configuration to the request's bucket.
    async fn put_bucket_website(
        &self,
        profile: &ProfileName,
        request: &WebsiteWriteRequest,
    ) -> StorageResult<()>;
}
