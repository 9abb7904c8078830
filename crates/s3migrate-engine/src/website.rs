//! Website configuration mapper.
//!
//! Translates a source bucket's website configuration into the write request
//! for the destination bucket. The storage API treats the presence of a group
//! (a redirect, a condition, ...) as a commitment to its required fields, so
//! only fields actually present on the source are copied and any group left
//! without fields is omitted. Empty strings count as absent.

use s3migrate_model::{
    Condition, ErrorDocument, IndexDocument, Redirect, RedirectAllRequestsTo, RoutingRule,
    WebsiteConfig, WebsiteWriteRequest,
};

/// Build the destination write request for `source`.
///
/// Returns `None` when the source has no website configuration, or when
/// nothing survives the mapping; the caller must then skip the write.
///
/// # Examples
///
/// ```
/// use s3migrate_engine::website::map_for_destination;
///
/// assert!(map_for_destination(None, "site-new").is_none());
/// ```
#[must_use]
pub fn map_for_destination(
    source: Option<&WebsiteConfig>,
    destination_bucket: &str,
) -> Option<WebsiteWriteRequest> {
    let source = source?;

    let config = WebsiteConfig {
        index_document: source.index_document.as_ref().and_then(index_document),
        error_document: source.error_document.as_ref().and_then(error_document),
        redirect_all_requests_to: source
            .redirect_all_requests_to
            .as_ref()
            .and_then(redirect_all_requests_to),
        routing_rules: source
            .routing_rules
            .iter()
            .filter_map(routing_rule)
            .collect(),
    };

    if config == WebsiteConfig::default() {
        return None;
    }

    Some(WebsiteWriteRequest {
        bucket: destination_bucket.to_owned(),
        website_configuration: config,
    })
}

fn present(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

fn index_document(doc: &IndexDocument) -> Option<IndexDocument> {
    Some(IndexDocument {
        suffix: Some(present(doc.suffix.as_ref())?),
    })
}

fn error_document(doc: &ErrorDocument) -> Option<ErrorDocument> {
    Some(ErrorDocument {
        key: Some(present(doc.key.as_ref())?),
    })
}

fn redirect_all_requests_to(redirect: &RedirectAllRequestsTo) -> Option<RedirectAllRequestsTo> {
    let mapped = RedirectAllRequestsTo {
        host_name: present(redirect.host_name.as_ref()),
        protocol: present(redirect.protocol.as_ref()),
    };
    (mapped != RedirectAllRequestsTo::default()).then_some(mapped)
}

fn condition(condition: &Condition) -> Option<Condition> {
    let mapped = Condition {
        http_error_code_returned_equals: present(
            condition.http_error_code_returned_equals.as_ref(),
        ),
        key_prefix_equals: present(condition.key_prefix_equals.as_ref()),
    };
    (mapped != Condition::default()).then_some(mapped)
}

fn redirect(redirect: &Redirect) -> Option<Redirect> {
    let mapped = Redirect {
        host_name: present(redirect.host_name.as_ref()),
        http_redirect_code: present(redirect.http_redirect_code.as_ref()),
        protocol: present(redirect.protocol.as_ref()),
        replace_key_prefix_with: present(redirect.replace_key_prefix_with.as_ref()),
        replace_key_with: present(redirect.replace_key_with.as_ref()),
    };
    (mapped != Redirect::default()).then_some(mapped)
}

fn routing_rule(rule: &RoutingRule) -> Option<RoutingRule> {
    let mapped = RoutingRule {
        condition: rule.condition.as_ref().and_then(condition),
        redirect: rule.redirect.as_ref().and_then(redirect),
    };
    (mapped != RoutingRule::default()).then_some(mapped)
}
