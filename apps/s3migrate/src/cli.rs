use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "s3migrate",
    about = "Move an S3 bucket's policy and website settings to another account",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the buckets visible to a profile
    ListBuckets {
        /// Credential profile
        profile: String,
    },

    /// Print a bucket's access policy
    GetPolicy {
        /// Bucket name
        bucket: String,

        /// Credential profile owning the bucket
        profile: String,
    },

    /// Print a bucket's static-website configuration
    GetWebsite {
        /// Bucket name
        bucket: String,

        /// Credential profile owning the bucket
        profile: String,
    },

    /// Create the destination bucket and move policy and website settings to it
    ///
    /// Reads DESTINATION_ROOT_ID and DESTINATION_BUCKET_SUFFIX from the
    /// environment. Object data is not copied; the command prints the sync
    /// command to run afterwards.
    MigrateBucket {
        /// Source bucket name
        bucket: String,

        /// Credential profile of the source account
        source_profile: String,

        /// Credential profile of the destination account
        destination_profile: String,
    },
}
