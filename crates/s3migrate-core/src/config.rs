//! Migration configuration.
//!
//! Provides [`MigrateConfig`] for configuring bucket migrations. Values are
//! loaded from environment variables; credential profiles themselves are
//! resolved separately from the shared AWS config files.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::{CoreError, CoreResult};
use crate::types::AccountId;

/// Environment variable holding the destination account ID.
pub const DESTINATION_ROOT_ID: &str = "DESTINATION_ROOT_ID";
/// Environment variable holding the destination bucket suffix.
pub const DESTINATION_BUCKET_SUFFIX: &str = "DESTINATION_BUCKET_SUFFIX";

/// Migration configuration.
///
/// The destination settings have no defaults: a migration refuses to start
/// without them (see [`MigrateConfig::destination_root_id`] and
/// [`MigrateConfig::bucket_name_suffix`]).
///
/// # Examples
///
/// ```
/// use s3migrate_core::MigrateConfig;
///
/// let config = MigrateConfig::default();
/// assert_eq!(config.log_level, "info");
/// assert!(config.destination_root_id.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct MigrateConfig {
    /// Account ID of the destination account (12 digits).
    #[builder(default, setter(strip_option, into))]
    pub destination_root_id: Option<String>,

    /// Suffix appended to the source bucket name to derive the destination.
    #[builder(default, setter(strip_option, into))]
    pub destination_bucket_suffix: Option<String>,

    /// Endpoint override for S3-compatible servers.
    #[builder(default, setter(strip_option, into))]
    pub endpoint_url: Option<String>,

    /// Whether to use path-style addressing against the endpoint override.
    #[builder(default = false)]
    pub force_path_style: bool,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            destination_root_id: None,
            destination_bucket_suffix: None,
            endpoint_url: None,
            force_path_style: false,
            log_level: String::from("info"),
        }
    }
}

impl MigrateConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `DESTINATION_ROOT_ID` | *(unset)* |
    /// | `DESTINATION_BUCKET_SUFFIX` | *(unset)* |
    /// | `S3_ENDPOINT_URL` | *(unset)* |
    /// | `S3_FORCE_PATH_STYLE` | `false` |
    /// | `LOG_LEVEL` | `info` |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Examples
    ///
    /// ```
    /// use s3migrate_core::MigrateConfig;
    ///
    /// let config = MigrateConfig::from_lookup(|name| match name {
    ///     "DESTINATION_BUCKET_SUFFIX" => Some("-new".to_owned()),
    ///     _ => None,
    /// });
    /// assert_eq!(config.bucket_name_suffix().unwrap(), "-new");
    /// ```
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let mut config = Self::default();

        config.destination_root_id = var(DESTINATION_ROOT_ID);
        config.destination_bucket_suffix = var(DESTINATION_BUCKET_SUFFIX);
        config.endpoint_url = var("S3_ENDPOINT_URL");
        if let Some(v) = var("S3_FORCE_PATH_STYLE") {
            config.force_path_style = parse_bool(&v);
        }
        if let Some(v) = var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// The validated destination account ID.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingSetting`] when unset and
    /// [`CoreError::InvalidAccountId`] when not a 12-digit string.
    pub fn destination_root_id(&self) -> CoreResult<AccountId> {
        let id = self
            .destination_root_id
            .as_deref()
            .ok_or(CoreError::MissingSetting {
                name: DESTINATION_ROOT_ID,
            })?;
        AccountId::new(id.trim())
    }

    /// The non-empty destination bucket suffix.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingSetting`] when unset or empty.
    pub fn bucket_name_suffix(&self) -> CoreResult<&str> {
        self.destination_bucket_suffix
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(CoreError::MissingSetting {
                name: DESTINATION_BUCKET_SUFFIX,
            })
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
