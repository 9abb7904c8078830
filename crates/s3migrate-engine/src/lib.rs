//! Migration engine for s3migrate.
//!
//! Moves a bucket's access policy and website configuration from one account
//! to another. The policy transforms in [`policy`] and the website mapper in
//! [`website`] are pure; [`migrate::Migrator`] sequences them against a
//! [`store::BucketStore`], whose production implementation is
//! [`aws::AwsBucketStore`].

pub mod aws;
pub mod error;
pub mod migrate;
pub mod policy;
pub mod store;
pub mod website;

pub use aws::AwsBucketStore;
pub use error::{MigrationError, MigrationResult, MigrationStep, StorageError, StorageResult};
pub use migrate::{MigrationReport, MigrationRequest, Migrator, PolicyWrite, WebsiteOutcome};
pub use store::{BucketStore, CreateBucketOutcome};
