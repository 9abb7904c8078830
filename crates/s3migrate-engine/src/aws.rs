//! [`BucketStore`] backed by `aws-sdk-s3`.
//!
//! One SDK client is built per credential profile, on first use, from the
//! shared AWS config files (region and credentials), and cached in a
//! [`ProfileStore`] for the rest of the process run.

use std::error::Error as StdError;
use std::fmt;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::get_bucket_website::GetBucketWebsiteOutput;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, Protocol, WebsiteConfiguration,
};
use s3migrate_core::{MigrateConfig, ProfileName, ProfileStore};
use s3migrate_model::{
    Condition, ErrorDocument, IndexDocument, Redirect, RedirectAllRequestsTo, RoutingRule,
    WebsiteConfig, WebsiteWriteRequest,
};
use tracing::debug;

use crate::error::{StorageError, StorageResult};
use crate::store::{BucketStore, CreateBucketOutcome};

/// Region in which buckets are created without a location constraint.
const DEFAULT_REGION: &str = "us-east-1";

/// S3 bucket store with a per-profile client cache.
///
/// # Examples
///
/// ```
/// use s3migrate_core::MigrateConfig;
/// use s3migrate_engine::aws::AwsBucketStore;
///
/// let store = AwsBucketStore::new(&MigrateConfig::default());
/// assert_eq!(store.cached_clients(), 0);
/// ```
#[derive(Debug)]
pub struct AwsBucketStore {
    clients: ProfileStore<Client>,
    endpoint_url: Option<String>,
    force_path_style: bool,
}

impl AwsBucketStore {
    /// Create a store; clients are built lazily per profile.
    #[must_use]
    pub fn new(config: &MigrateConfig) -> Self {
        Self {
            clients: ProfileStore::new(),
            endpoint_url: config.endpoint_url.clone(),
            force_path_style: config.force_path_style,
        }
    }

    /// Use `client` for `profile` instead of loading it from the config files.
    #[must_use]
    pub fn with_client(self, profile: &ProfileName, client: Client) -> Self {
        self.clients.insert(profile, client);
        self
    }

    /// Number of profiles with a cached client.
    #[must_use]
    pub fn cached_clients(&self) -> usize {
        self.clients.len()
    }

    async fn client(&self, profile: &ProfileName) -> StorageResult<Client> {
        if let Some(client) = self.clients.get(profile) {
            return Ok(client);
        }

        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).profile_name(profile.as_str());
        if let Some(endpoint) = &self.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let shared_config = loader.load().await;

        if shared_config.region().is_none() {
            return Err(StorageError::Profile {
                profile: profile.to_string(),
                message: "no region configured".to_owned(),
            });
        }

        let s3_config = aws_sdk_s3::config::Builder::from(&shared_config)
            .force_path_style(self.force_path_style)
            .build();
        debug!(
            profile = %profile,
            region = ?shared_config.region(),
            "created S3 client"
        );

        Ok(self.clients.insert(profile, Client::from_conf(s3_config)))
    }
}

#[async_trait]
impl BucketStore for AwsBucketStore {
    async fn list_buckets(&self, profile: &ProfileName) -> StorageResult<Vec<String>> {
        let client = self.client(profile).await?;
        let mut names = Vec::new();
        let mut continuation_token = None;

        loop {
            let output = client
                .list_buckets()
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|e| remote_error("ListBuckets", profile.as_str(), &e))?;

            names.extend(
                output
                    .buckets()
                    .iter()
                    .filter_map(|b| b.name())
                    .map(ToOwned::to_owned),
            );

            match output.continuation_token() {
                Some(token) if !token.is_empty() => {
                    continuation_token = Some(token.to_owned());
                }
                _ => break,
            }
        }

        Ok(names)
    }

    async fn get_bucket_policy(
        &self,
        bucket: &str,
        profile: &ProfileName,
    ) -> StorageResult<Option<String>> {
        let client = self.client(profile).await?;
        match client.get_bucket_policy().bucket(bucket).send().await {
            Ok(output) => Ok(output.policy().map(ToOwned::to_owned)),
            Err(e) if service_code(&e) == Some("NoSuchBucketPolicy") => Ok(None),
            Err(e) => Err(remote_error("GetBucketPolicy", bucket, &e)),
        }
    }

    async fn put_bucket_policy(
        &self,
        bucket: &str,
        profile: &ProfileName,
        policy: &str,
    ) -> StorageResult<()> {
        let client = self.client(profile).await?;
        client
            .put_bucket_policy()
            .bucket(bucket)
            .policy(policy)
            .send()
            .await
            .map_err(|e| remote_error("PutBucketPolicy", bucket, &e))?;

        debug!(bucket = %bucket, profile = %profile, "put_bucket_policy completed");
        Ok(())
    }

    async fn create_bucket(
        &self,
        bucket: &str,
        profile: &ProfileName,
    ) -> StorageResult<CreateBucketOutcome> {
        let client = self.client(profile).await?;
        let region = client.config().region().map(ToString::to_string);

        let mut request = client.create_bucket().bucket(bucket);
        if let Some(region) = region.filter(|r| r != DEFAULT_REGION) {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region.as_str()))
                    .build(),
            );
        }

        match request.send().await {
            Ok(_) => Ok(CreateBucketOutcome::Created),
            Err(e) => {
                if let Some(service_error) = e.as_service_error() {
                    if service_error.is_bucket_already_owned_by_you() {
                        return Ok(CreateBucketOutcome::AlreadyOwnedByCaller);
                    }
                    if service_error.is_bucket_already_exists() {
                        return Ok(CreateBucketOutcome::AlreadyExists);
                    }
                    if service_error.code() == Some("OperationAborted") {
                        return Ok(CreateBucketOutcome::OperationAborted {
                            message: service_error.message().unwrap_or_default().to_owned(),
                        });
                    }
                }
                Err(remote_error("CreateBucket", bucket, &e))
            }
        }
    }

    async fn get_bucket_website(
        &self,
        bucket: &str,
        profile: &ProfileName,
    ) -> StorageResult<Option<WebsiteConfig>> {
        let client = self.client(profile).await?;
        match client.get_bucket_website().bucket(bucket).send().await {
            Ok(output) => Ok(Some(website_from_output(&output))),
            Err(e) if service_code(&e) == Some("NoSuchWebsiteConfiguration") => Ok(None),
            Err(e) => Err(remote_error("GetBucketWebsite", bucket, &e)),
        }
    }

    async fn put_bucket_website(
        &self,
        profile: &ProfileName,
        request: &WebsiteWriteRequest,
    ) -> StorageResult<()> {
        let client = self.client(profile).await?;
        let configuration = website_to_sdk(&request.website_configuration)?;
        client
            .put_bucket_website()
            .bucket(&request.bucket)
            .website_configuration(configuration)
            .send()
            .await
            .map_err(|e| remote_error("PutBucketWebsite", &request.bucket, &e))?;

        debug!(bucket = %request.bucket, profile = %profile, "put_bucket_website completed");
        Ok(())
    }
}

/// Service error code of a failed call, if the service returned one.
fn service_code<E: ProvideErrorMetadata, R>(err: &SdkError<E, R>) -> Option<&str> {
    err.as_service_error().and_then(ProvideErrorMetadata::code)
}

fn remote_error<E, R>(operation: &'static str, target: &str, err: &SdkError<E, R>) -> StorageError
where
    E: ProvideErrorMetadata + StdError + 'static,
    R: fmt::Debug,
{
    let message = err
        .as_service_error()
        .and_then(ProvideErrorMetadata::message)
        .map_or_else(|| DisplayErrorContext(err).to_string(), ToOwned::to_owned);

    StorageError::Remote {
        operation,
        target: target.to_owned(),
        code: service_code(err).map(ToOwned::to_owned),
        message,
    }
}

fn website_from_output(output: &GetBucketWebsiteOutput) -> WebsiteConfig {
    WebsiteConfig {
        index_document: output.index_document().map(|d| IndexDocument {
            suffix: Some(d.suffix().to_owned()),
        }),
        error_document: output.error_document().map(|d| ErrorDocument {
            key: Some(d.key().to_owned()),
        }),
        redirect_all_requests_to: output.redirect_all_requests_to().map(|r| {
            RedirectAllRequestsTo {
                host_name: Some(r.host_name().to_owned()),
                protocol: r.protocol().map(|p| p.as_str().to_owned()),
            }
        }),
        routing_rules: output
            .routing_rules()
            .iter()
            .map(|rule| RoutingRule {
                condition: rule.condition().map(|c| Condition {
                    http_error_code_returned_equals: c
                        .http_error_code_returned_equals()
                        .map(ToOwned::to_owned),
                    key_prefix_equals: c.key_prefix_equals().map(ToOwned::to_owned),
                }),
                redirect: rule.redirect().map(|r| Redirect {
                    host_name: r.host_name().map(ToOwned::to_owned),
                    http_redirect_code: r.http_redirect_code().map(ToOwned::to_owned),
                    protocol: r.protocol().map(|p| p.as_str().to_owned()),
                    replace_key_prefix_with: r.replace_key_prefix_with().map(ToOwned::to_owned),
                    replace_key_with: r.replace_key_with().map(ToOwned::to_owned),
                }),
            })
            .collect(),
    }
}

fn invalid_website(err: impl fmt::Display) -> StorageError {
    StorageError::InvalidRequest {
        operation: "PutBucketWebsite",
        message: err.to_string(),
    }
}

fn website_to_sdk(config: &WebsiteConfig) -> StorageResult<WebsiteConfiguration> {
    use aws_sdk_s3::types as s3;

    let mut builder = WebsiteConfiguration::builder();

    if let Some(doc) = &config.index_document {
        let index = s3::IndexDocument::builder()
            .set_suffix(doc.suffix.clone())
            .build()
            .map_err(invalid_website)?;
        builder = builder.index_document(index);
    }

    if let Some(doc) = &config.error_document {
        let error = s3::ErrorDocument::builder()
            .set_key(doc.key.clone())
            .build()
            .map_err(invalid_website)?;
        builder = builder.error_document(error);
    }

    if let Some(redirect) = &config.redirect_all_requests_to {
        let redirect_all = s3::RedirectAllRequestsTo::builder()
            .set_host_name(redirect.host_name.clone())
            .set_protocol(redirect.protocol.as_deref().map(Protocol::from))
            .build()
            .map_err(invalid_website)?;
        builder = builder.redirect_all_requests_to(redirect_all);
    }

    for rule in &config.routing_rules {
        let condition = rule.condition.as_ref().map(|c| {
            s3::Condition::builder()
                .set_http_error_code_returned_equals(c.http_error_code_returned_equals.clone())
                .set_key_prefix_equals(c.key_prefix_equals.clone())
                .build()
        });
        let Some(redirect) = &rule.redirect else {
            return Err(invalid_website("routing rule has no redirect"));
        };
        let redirect = s3::Redirect::builder()
            .set_host_name(redirect.host_name.clone())
            .set_http_redirect_code(redirect.http_redirect_code.clone())
            .set_protocol(redirect.protocol.as_deref().map(Protocol::from))
            .set_replace_key_prefix_with(redirect.replace_key_prefix_with.clone())
            .set_replace_key_with(redirect.replace_key_with.clone())
            .build();
        builder = builder.routing_rules(
            s3::RoutingRule::builder()
                .set_condition(condition)
                .redirect(redirect)
                .build(),
        );
    }

    Ok(builder.build())
}
