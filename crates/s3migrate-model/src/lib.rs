//! Bucket policy and website configuration model for s3migrate.
//!
//! [`policy`] holds the in-memory form of a JSON bucket access policy and its
//! parse/serialize pair. [`website`] holds the static-website configuration
//! shapes read from a source bucket and written to a destination bucket.

pub mod error;
pub mod policy;
pub mod website;

pub use error::{PolicyError, PolicyResult};
pub use policy::{DELEGATION_SID, Effect, OneOrMany, POLICY_VERSION, PolicyDocument, Statement};
pub use website::{
    Condition, ErrorDocument, IndexDocument, Redirect, RedirectAllRequestsTo, RoutingRule,
    WebsiteConfig, WebsiteWriteRequest,
};
