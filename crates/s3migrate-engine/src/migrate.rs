//! Migration orchestrator.
//!
//! [`Migrator::migrate`] runs one migration as a single sequential pass:
//!
//! ```text
//! fetch source policy ─> derive ─> create destination bucket
//!   ─> write destination policy ─> write updated source policy
//!   ─> fetch / map / write website ─> sync instruction
//! ```
//!
//! There are no retries and no rollback. A failed step aborts the run and
//! leaves earlier writes in place; every step is safe to repeat, so the
//! recovery path is to run the migration again.

use s3migrate_core::{AccountId, MigrateConfig, ProfileName};
use s3migrate_model::{PolicyDocument, WebsiteWriteRequest};
use tracing::{debug, info, warn};

use crate::error::{MigrationError, MigrationResult, MigrationStep, StorageError};
use crate::policy::derive_policies;
use crate::store::{BucketStore, CreateBucketOutcome};
use crate::website::map_for_destination;

/// Parameters of one migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationRequest {
    /// Bucket being migrated.
    pub source_bucket: String,
    /// Profile of the account that owns the source bucket.
    pub source_profile: ProfileName,
    /// Profile of the account receiving the destination bucket.
    pub destination_profile: ProfileName,
    /// Destination account, granted access back to the source bucket.
    pub destination_root_id: AccountId,
    /// Suffix appended to the source name to form the destination name.
    pub bucket_name_suffix: String,
}

impl MigrationRequest {
    /// Build a request, validating the destination settings in `config`.
    ///
    /// This is the pre-flight check: it fails before any remote call is
    /// made when the destination account ID or the bucket suffix is missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use s3migrate_core::MigrateConfig;
    /// use s3migrate_engine::migrate::MigrationRequest;
    ///
    /// let config = MigrateConfig::builder()
    ///     .destination_root_id("999999999999")
    ///     .destination_bucket_suffix("-new")
    ///     .build();
    /// let request = MigrationRequest::new(&config, "app-data", "old", "new").unwrap();
    /// assert_eq!(request.destination_bucket(), "app-data-new");
    ///
    /// assert!(MigrationRequest::new(&MigrateConfig::default(), "app-data", "old", "new").is_err());
    /// ```
    pub fn new(
        config: &MigrateConfig,
        source_bucket: impl Into<String>,
        source_profile: impl Into<ProfileName>,
        destination_profile: impl Into<ProfileName>,
    ) -> MigrationResult<Self> {
        let destination_root_id = config.destination_root_id()?;
        let bucket_name_suffix = config.bucket_name_suffix()?.to_owned();

        Ok(Self {
            source_bucket: source_bucket.into(),
            source_profile: source_profile.into(),
            destination_profile: destination_profile.into(),
            destination_root_id,
            bucket_name_suffix,
        })
    }

    /// Name of the destination bucket.
    #[must_use]
    pub fn destination_bucket(&self) -> String {
        format!("{}{}", self.source_bucket, self.bucket_name_suffix)
    }

    /// The command that copies the object data, run by the operator.
    ///
    /// This is the literal `aws s3 sync` invocation rather than a prose
    /// description, so the operator can paste it as is. It runs under the
    /// destination profile, which the delegation statement grants read
    /// access to the source bucket.
    #[must_use]
    pub fn sync_command(&self) -> String {
        format!(
            "aws s3 sync s3://{} s3://{} --profile {}",
            self.source_bucket,
            self.destination_bucket(),
            self.destination_profile
        )
    }
}

/// What happened to a policy write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyWrite {
    /// The policy was written.
    Written,
    /// The policy had no statements and was not written.
    SkippedEmpty,
}

/// What happened to the website configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebsiteOutcome {
    /// The mapped configuration was written to the destination bucket.
    Written(WebsiteWriteRequest),
    /// The source bucket has no website configuration.
    NotConfigured,
    /// The source configuration had no fields left to copy.
    SkippedEmpty,
}

/// Summary of a completed migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Bucket that was migrated.
    pub source_bucket: String,
    /// Bucket created (or found) in the destination account.
    pub destination_bucket: String,
    /// Result of the destination bucket creation.
    pub bucket_creation: CreateBucketOutcome,
    /// Write of the renamed policy onto the destination bucket.
    pub destination_policy: PolicyWrite,
    /// Write of the delegating policy onto the source bucket.
    pub source_policy: PolicyWrite,
    /// Website transfer.
    pub website: WebsiteOutcome,
    /// Operator-facing messages, in the order they were raised.
    pub notices: Vec<String>,
    /// Command that copies the object data.
    pub sync_command: String,
}

impl MigrationReport {
    /// The closing instruction telling the operator how to copy the data.
    #[must_use]
    pub fn sync_instruction(&self) -> String {
        format!(
            "run \"{}\" to transfer the data between buckets",
            self.sync_command
        )
    }
}

/// Runs migrations against a [`BucketStore`].
#[derive(Debug)]
pub struct Migrator<S> {
    store: S,
}

impl<S: BucketStore> Migrator<S> {
    /// Create a migrator over `store`.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Migrate the source bucket's policy and website configuration.
    ///
    /// Tolerated bucket-creation conditions become notices; every other
    /// remote failure aborts with [`MigrationError::Step`], which carries
    /// the notices raised before the failure.
    pub async fn migrate(&self, request: &MigrationRequest) -> MigrationResult<MigrationReport> {
        let mut notices = Vec::new();
        match self.run(request, &mut notices).await {
            Ok(mut report) => {
                report.notices = notices;
                Ok(report)
            }
            Err(err) => Err(err.with_notices(notices)),
        }
    }

    async fn run(
        &self,
        request: &MigrationRequest,
        notices: &mut Vec<String>,
    ) -> MigrationResult<MigrationReport> {
        let source_bucket = request.source_bucket.as_str();
        let destination_bucket = request.destination_bucket();

        info!(
            source_bucket = %source_bucket,
            destination_bucket = %destination_bucket,
            source_profile = %request.source_profile,
            destination_profile = %request.destination_profile,
            "starting bucket migration"
        );

        let raw_policy = self
            .store
            .get_bucket_policy(source_bucket, &request.source_profile)
            .await
            .map_err(step(MigrationStep::FetchSourcePolicy))?;
        let fetched = PolicyDocument::parse(raw_policy.as_deref())?;

        let derived = derive_policies(
            &fetched,
            source_bucket,
            &destination_bucket,
            &request.destination_root_id,
        )?;

        let bucket_creation = self
            .create_destination_bucket(&destination_bucket, request, notices)
            .await?;

        let destination_policy = self
            .write_policy(
                &destination_bucket,
                &request.destination_profile,
                &derived.destination,
                MigrationStep::WriteDestinationPolicy,
                notices,
            )
            .await?;

        let source_policy = self
            .write_policy(
                source_bucket,
                &request.source_profile,
                &derived.updated_source,
                MigrationStep::WriteSourcePolicy,
                notices,
            )
            .await?;

        let website = self
            .transfer_website(&destination_bucket, request, notices)
            .await?;

        let report = MigrationReport {
            source_bucket: source_bucket.to_owned(),
            destination_bucket,
            bucket_creation,
            destination_policy,
            source_policy,
            website,
            notices: Vec::new(),
            sync_command: request.sync_command(),
        };

        info!(sync_command = %report.sync_command, "bucket migration completed");
        Ok(report)
    }

    async fn create_destination_bucket(
        &self,
        bucket: &str,
        request: &MigrationRequest,
        notices: &mut Vec<String>,
    ) -> MigrationResult<CreateBucketOutcome> {
        info!(bucket = %bucket, profile = %request.destination_profile, "creating destination bucket");

        let outcome = self
            .store
            .create_bucket(bucket, &request.destination_profile)
            .await
            .map_err(step(MigrationStep::CreateDestinationBucket))?;

        match &outcome {
            CreateBucketOutcome::Created => {
                notify(notices, format!("Created {bucket}"));
            }
            CreateBucketOutcome::AlreadyOwnedByCaller => {
                notify(notices, format!("You already created and own {bucket}"));
            }
            CreateBucketOutcome::AlreadyExists => {
                caution(
                    notices,
                    format!(
                        "Bucket {bucket} already exists. If you're renaming back to the original \
                         name but on the new account, make sure it's deleted on the original"
                    ),
                );
                caution(
                    notices,
                    "Verify that all the data and settings you need have transferred properly"
                        .to_owned(),
                );
            }
            CreateBucketOutcome::OperationAborted { message } => {
                if !message.is_empty() {
                    caution(notices, message.clone());
                }
                caution(
                    notices,
                    "If the bucket name was recently deleted, it can take some time to release \
                     it for recreation"
                        .to_owned(),
                );
            }
        }

        Ok(outcome)
    }

    async fn write_policy(
        &self,
        bucket: &str,
        profile: &ProfileName,
        policy: &PolicyDocument,
        migration_step: MigrationStep,
        notices: &mut Vec<String>,
    ) -> MigrationResult<PolicyWrite> {
        if policy.is_empty() {
            notify(notices, format!("Policy was empty. Nothing to write to {bucket}"));
            return Ok(PolicyWrite::SkippedEmpty);
        }

        let json = policy.to_json()?;
        debug!(bucket = %bucket, policy = %json, "writing bucket policy");

        self.store
            .put_bucket_policy(bucket, profile, &json)
            .await
            .map_err(step(migration_step))?;

        notify(notices, format!("Wrote policy to {bucket}"));
        Ok(PolicyWrite::Written)
    }

    async fn transfer_website(
        &self,
        destination_bucket: &str,
        request: &MigrationRequest,
        notices: &mut Vec<String>,
    ) -> MigrationResult<WebsiteOutcome> {
        let source_website = self
            .store
            .get_bucket_website(&request.source_bucket, &request.source_profile)
            .await
            .map_err(step(MigrationStep::FetchSourceWebsite))?;

        let Some(source_website) = source_website else {
            notify(notices, "No website settings to transfer".to_owned());
            return Ok(WebsiteOutcome::NotConfigured);
        };

        let Some(write) = map_for_destination(Some(&source_website), destination_bucket) else {
            notify(
                notices,
                format!(
                    "Website settings on {} have nothing to copy",
                    request.source_bucket
                ),
            );
            return Ok(WebsiteOutcome::SkippedEmpty);
        };

        debug!(bucket = %destination_bucket, website = ?write.website_configuration, "writing website settings");
        self.store
            .put_bucket_website(&request.destination_profile, &write)
            .await
            .map_err(step(MigrationStep::WriteDestinationWebsite))?;

        notify(notices, format!("Wrote website settings to {destination_bucket}"));
        Ok(WebsiteOutcome::Written(write))
    }
}

/// Record a progress notice, logging it as it is raised.
fn notify(notices: &mut Vec<String>, message: String) {
    info!(notice = %message, "migration progress");
    notices.push(message);
}

/// Record a notice the operator has to act on.
fn caution(notices: &mut Vec<String>, message: String) {
    warn!(notice = %message, "manual verification needed");
    notices.push(message);
}

fn step(step: MigrationStep) -> impl FnOnce(StorageError) -> MigrationError {
    move |source| MigrationError::Step {
        step,
        source,
        notices: Vec::new(),
    }
}
