//! Integration tests for s3migrate.
//!
//! These tests require a running S3-compatible server at `localhost:4566`
//! (override with `S3_ENDPOINT_URL`). They are marked `#[ignore]` so they
//! don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p s3migrate-integration -- --ignored
//! ```

use std::sync::Once;

use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use s3migrate_core::{MigrateConfig, ProfileName};
use s3migrate_engine::AwsBucketStore;

static INIT: Once = Once::new();

/// Profile the source buckets are accessed under.
pub const SOURCE_PROFILE: &str = "source";

/// Profile the destination buckets are accessed under.
pub const DESTINATION_PROFILE: &str = "destination";

/// Destination account used in delegation statements.
pub const DESTINATION_ROOT_ID: &str = "000000000000";

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL for the server.
fn endpoint_url() -> String {
    std::env::var("S3_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:4566".to_owned())
}

/// Create a configured S3 client pointing at the local server.
#[must_use]
pub fn s3_client() -> aws_sdk_s3::Client {
    init_tracing();

    let creds = Credentials::new("test", "test", None, None, "integration-test");

    let config = aws_sdk_s3::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(creds)
        .endpoint_url(endpoint_url())
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(config)
}

/// A store where both test profiles use the local server client.
#[must_use]
pub fn bucket_store(client: &aws_sdk_s3::Client) -> AwsBucketStore {
    AwsBucketStore::new(&MigrateConfig::default())
        .with_client(&ProfileName::from(SOURCE_PROFILE), client.clone())
        .with_client(&ProfileName::from(DESTINATION_PROFILE), client.clone())
}

/// Migration settings pointing at the test destination account.
#[must_use]
pub fn migrate_config(suffix: &str) -> MigrateConfig {
    MigrateConfig::builder()
        .destination_root_id(DESTINATION_ROOT_ID)
        .destination_bucket_suffix(suffix)
        .build()
}

/// Generate a unique bucket name for a test.
#[must_use]
pub fn test_bucket_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// Create a bucket and return its name. Caller is responsible for cleanup.
pub async fn create_test_bucket(client: &aws_sdk_s3::Client, prefix: &str) -> String {
    let name = test_bucket_name(prefix);
    client
        .create_bucket()
        .bucket(&name)
        .send()
        .await
        .unwrap_or_else(|e| panic!("failed to create bucket {name}: {e}"));
    name
}

/// Read back a bucket policy as JSON.
pub async fn read_policy(client: &aws_sdk_s3::Client, bucket: &str) -> serde_json::Value {
    let resp = client
        .get_bucket_policy()
        .bucket(bucket)
        .send()
        .await
        .unwrap_or_else(|e| panic!("failed to read policy of {bucket}: {e}"));
    serde_json::from_str(resp.policy().unwrap_or_default()).expect("policy should be JSON")
}

/// Delete all objects in a bucket, then delete the bucket.
pub async fn cleanup_bucket(client: &aws_sdk_s3::Client, bucket: &str) {
    let mut continuation_token = None;
    loop {
        let mut req = client.list_objects_v2().bucket(bucket);
        if let Some(token) = continuation_token.take() {
            req = req.continuation_token(token);
        }
        let Ok(resp) = req.send().await else {
            return; // Bucket may not exist.
        };

        for obj in resp.contents() {
            if let Some(key) = obj.key() {
                let _ = client.delete_object().bucket(bucket).key(key).send().await;
            }
        }

        if resp.is_truncated() == Some(true) {
            continuation_token = resp.next_continuation_token().map(ToOwned::to_owned);
        } else {
            break;
        }
    }

    let _ = client.delete_bucket().bucket(bucket).send().await;
}

mod test_migrate;
mod test_store;
