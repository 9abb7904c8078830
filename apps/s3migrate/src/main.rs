//! s3migrate - move an S3 bucket's access policy and website settings from
//! one account to another.
//!
//! # Usage
//!
//! ```text
//! DESTINATION_ROOT_ID=999999999999 DESTINATION_BUCKET_SUFFIX=-new \
//!     s3migrate migrate-bucket app-data legacy primary
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DESTINATION_ROOT_ID` | *(unset)* | Destination account ID, required by `migrate-bucket` |
//! | `DESTINATION_BUCKET_SUFFIX` | *(unset)* | Destination name suffix, required by `migrate-bucket` |
//! | `S3_ENDPOINT_URL` | *(unset)* | Endpoint override for S3-compatible servers |
//! | `S3_FORCE_PATH_STYLE` | `false` | Path-style addressing |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use s3migrate_core::{MigrateConfig, ProfileName};
use s3migrate_engine::{AwsBucketStore, BucketStore, MigrationReport, MigrationRequest, Migrator};
use s3migrate_model::PolicyDocument;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
/// Logs go to stderr so that command output on stdout stays parseable.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

async fn list_buckets(store: &AwsBucketStore, profile: &str) -> Result<()> {
    let buckets = store
        .list_buckets(&ProfileName::from(profile))
        .await
        .with_context(|| format!("cannot list buckets for profile {profile}"))?;

    for bucket in buckets {
        println!("{bucket}");
    }
    Ok(())
}

async fn get_policy(store: &AwsBucketStore, bucket: &str, profile: &str) -> Result<()> {
    let raw = store
        .get_bucket_policy(bucket, &ProfileName::from(profile))
        .await
        .with_context(|| format!("cannot read policy of {bucket}"))?;
    let policy = PolicyDocument::parse(raw.as_deref())
        .with_context(|| format!("policy of {bucket} is not valid JSON"))?;

    println!("{}", policy.to_json_pretty()?);
    Ok(())
}

async fn get_website(store: &AwsBucketStore, bucket: &str, profile: &str) -> Result<()> {
    let website = store
        .get_bucket_website(bucket, &ProfileName::from(profile))
        .await
        .with_context(|| format!("cannot read website settings of {bucket}"))?;

    match website {
        Some(website) => println!("{}", serde_json::to_string_pretty(&website)?),
        None => println!("{bucket} has no website settings"),
    }
    Ok(())
}

async fn migrate_bucket(
    config: &MigrateConfig,
    store: AwsBucketStore,
    bucket: &str,
    source_profile: &str,
    destination_profile: &str,
) -> Result<()> {
    let request = MigrationRequest::new(config, bucket, source_profile, destination_profile)?;
    info!(
        destination_bucket = %request.destination_bucket(),
        destination_root_id = %request.destination_root_id,
        "pre-flight checks passed"
    );

    match Migrator::new(store).migrate(&request).await {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(err) => {
            print_notices(err.notices());
            Err(err).with_context(|| format!("migration of {bucket} did not complete"))
        }
    }
}

fn print_notices(notices: &[String]) {
    for notice in notices {
        println!("{notice}");
    }
}

fn print_report(report: &MigrationReport) {
    print_notices(&report.notices);
    println!("{}", report.sync_instruction());
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = MigrateConfig::from_env();

    init_tracing(&config.log_level)?;

    let store = AwsBucketStore::new(&config);

    match cli.command {
        Commands::ListBuckets { profile } => list_buckets(&store, &profile).await,
        Commands::GetPolicy { bucket, profile } => get_policy(&store, &bucket, &profile).await,
        Commands::GetWebsite { bucket, profile } => get_website(&store, &bucket, &profile).await,
        Commands::MigrateBucket {
            bucket,
            source_profile,
            destination_profile,
        } => {
            migrate_bucket(
                &config,
                store,
                &bucket,
                &source_profile,
                &destination_profile,
            )
            .await
        }
    }
}
