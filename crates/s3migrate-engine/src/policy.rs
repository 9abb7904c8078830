//! Policy transform engine.
//!
//! Pure functions over [`PolicyDocument`]. None of them mutates its input,
//! so one fetched document can feed both derivations of a migration:
//!
//! ```text
//! fetched ── strip_delegation ─┬─ rename_resources(source → destination) ──> destination policy
//!                              └─ add_delegation(source, root id) ─────────> updated source policy
//! ```

use s3migrate_core::AccountId;
use s3migrate_model::{
    DELEGATION_SID, Effect, OneOrMany, PolicyDocument, PolicyError, PolicyResult, Statement,
};
use serde_json::{Map, json};

/// ARN of a bucket.
#[must_use]
pub fn bucket_arn(bucket: &str) -> String {
    format!("arn:aws:s3:::{bucket}")
}

/// The delegation statement granting `root_id`'s account root full access
/// to `bucket` and its objects.
#[must_use]
pub fn delegation_statement(bucket: &str, root_id: &AccountId) -> Statement {
    let arn = bucket_arn(bucket);
    Statement {
        sid: Some(DELEGATION_SID.to_owned()),
        effect: Effect::Allow,
        principal: Some(json!({ "AWS": root_id.root_arn() })),
        action: Some(OneOrMany::One("s3:*".to_owned())),
        resource: Some(OneOrMany::Many(vec![arn.clone(), format!("{arn}/*")])),
        extra: Map::new(),
    }
}

/// Copy of `doc` without any delegation statement.
#[must_use]
pub fn strip_delegation(doc: &PolicyDocument) -> PolicyDocument {
    PolicyDocument {
        version: doc.version.clone(),
        id: doc.id.clone(),
        statements: doc
            .statements
            .iter()
            .filter(|s| !s.is_delegation())
            .cloned()
            .collect(),
    }
}

/// Copy of `doc` with every occurrence of `from_bucket` replaced by
/// `to_bucket`.
///
/// The substitution is textual over the serialized document, so it reaches
/// every string: resource and principal ARNs, sids, actions, conditions. A
/// statement that merely contains the bucket name as a substring is
/// rewritten too.
///
/// # Errors
///
/// Returns [`PolicyError::EmptyDocument`] if `to_bucket` is empty.
pub fn rename_resources(
    doc: &PolicyDocument,
    from_bucket: &str,
    to_bucket: &str,
) -> PolicyResult<PolicyDocument> {
    if to_bucket.is_empty() {
        return Err(PolicyError::EmptyDocument);
    }
    if from_bucket.is_empty() {
        return Ok(doc.clone());
    }

    let json = doc.to_json()?;
    PolicyDocument::parse(Some(&json.replace(from_bucket, to_bucket)))
}

/// Copy of `doc` with exactly one delegation statement for `bucket`,
/// appended after the remaining statements.
#[must_use]
pub fn add_delegation(doc: &PolicyDocument, bucket: &str, root_id: &AccountId) -> PolicyDocument {
    let mut updated = strip_delegation(doc);
    updated
        .statements
        .push(delegation_statement(bucket, root_id));
    updated
}

/// The two documents a migration writes.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedPolicies {
    /// Policy for the destination bucket.
    pub destination: PolicyDocument,
    /// Policy written back onto the source bucket.
    pub updated_source: PolicyDocument,
}

/// Derive both migration documents from the fetched source policy.
pub fn derive_policies(
    fetched: &PolicyDocument,
    source_bucket: &str,
    destination_bucket: &str,
    root_id: &AccountId,
) -> PolicyResult<DerivedPolicies> {
    let stripped = strip_delegation(fetched);
    let destination = rename_resources(&stripped, source_bucket, destination_bucket)?;

    // A source bucket without a policy keeps none. A policy holding only a
    // delegation still gets a fresh one for `root_id`.
    let updated_source = if fetched.is_empty() {
        stripped
    } else {
        add_delegation(&stripped, source_bucket, root_id)
    };

    Ok(DerivedPolicies {
        destination,
        updated_source,
    })
}
