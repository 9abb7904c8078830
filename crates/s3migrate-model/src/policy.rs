//! Bucket access policy document model.
//!
//! A [`PolicyDocument`] is the typed form of the JSON document attached to a
//! bucket. Only the fields the migration engine reasons about are typed;
//! everything else on a statement (`Condition`, `NotPrincipal`, ...) is kept
//! verbatim in [`Statement::extra`] so that foreign statements survive a
//! parse/serialize cycle unchanged.
//!
//! # Examples
//!
//! ```
//! use s3migrate_model::PolicyDocument;
//!
//! let doc = PolicyDocument::parse(None).unwrap();
//! assert_eq!(doc, PolicyDocument::empty());
//! assert_eq!(doc.to_json().unwrap(), r#"{"Version":"2012-10-17","Statement":[]}"#);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{PolicyError, PolicyResult};

/// Policy language version written on every document this crate creates.
pub const POLICY_VERSION: &str = "2012-10-17";

/// Statement ID of the cross-account delegation clause managed by s3migrate.
pub const DELEGATION_SID: &str = "DelegateS3Access";

fn default_version() -> String {
    POLICY_VERSION.to_owned()
}

/// A bucket access policy document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    /// Policy language version.
    #[serde(default = "default_version")]
    pub version: String,

    /// Optional policy identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Ordered statements; may be empty.
    #[serde(rename = "Statement", default)]
    pub statements: Vec<Statement>,
}

impl PolicyDocument {
    /// The canonical empty document, used when a bucket has no policy.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            version: default_version(),
            id: None,
            statements: Vec::new(),
        }
    }

    /// Parse a fetched policy.
    ///
    /// `None` means the bucket has no policy and yields [`PolicyDocument::empty`].
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::Malformed`] if `raw` is not a JSON policy document.
    pub fn parse(raw: Option<&str>) -> PolicyResult<Self> {
        match raw {
            None => Ok(Self::empty()),
            Some(raw) => serde_json::from_str(raw).map_err(PolicyError::Malformed),
        }
    }

    /// Serialize to the compact JSON form sent to the storage API.
    pub fn to_json(&self) -> PolicyResult<String> {
        serde_json::to_string(self).map_err(PolicyError::Serialize)
    }

    /// Serialize to indented JSON for display.
    pub fn to_json_pretty(&self) -> PolicyResult<String> {
        serde_json::to_string_pretty(self).map_err(PolicyError::Serialize)
    }

    /// Whether the document has no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Statements carrying the given `Sid`.
    pub fn statements_with_sid<'a>(&'a self, sid: &'a str) -> impl Iterator<Item = &'a Statement> {
        self.statements
            .iter()
            .filter(move |s| s.sid.as_deref() == Some(sid))
    }
}

impl Default for PolicyDocument {
    fn default() -> Self {
        Self::empty()
    }
}

/// Whether a statement grants or denies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Grant the listed actions.
    Allow,
    /// Deny the listed actions.
    Deny,
}

/// A policy field that may be written as a single string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    /// A single value, e.g. `"s3:*"`.
    One(String),
    /// A list of values.
    Many(Vec<String>),
}

impl OneOrMany {
    /// Iterate over the contained values.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let values: &[String] = match self {
            Self::One(v) => std::slice::from_ref(v),
            Self::Many(v) => v,
        };
        values.iter().map(String::as_str)
    }

    /// Whether `value` is one of the contained values.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.iter().any(|v| v == value)
    }
}

/// A single policy statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    /// Optional statement identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,

    /// Allow or deny.
    pub effect: Effect,

    /// Principal block: `"*"` or an object such as `{"AWS": "arn:..."}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<Value>,

    /// Action or actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<OneOrMany>,

    /// Resource ARN or ARNs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<OneOrMany>,

    /// Every other statement field, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Statement {
    /// Whether this is the s3migrate-managed delegation statement.
    #[must_use]
    pub fn is_delegation(&self) -> bool {
        self.sid.as_deref() == Some(DELEGATION_SID)
    }
}
