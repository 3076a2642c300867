//! Governance tag constant and tag-shape helpers
//!
//! Every resource in scope must carry the governance tag. Only the key's
//! presence is audited; the value is irrelevant.

use std::collections::HashMap;

/// Tag key whose absence marks a resource as non-compliant.
pub const GOVERNANCE_TAG: &str = "CostCenter";

/// True iff the governance tag key is present. An empty tag map counts as
/// "key absent".
pub fn has_governance_tag(tags: &HashMap<String, String>) -> bool {
    tags.contains_key(GOVERNANCE_TAG)
}

/// Extract tags from any AWS tag type into a HashMap.
///
/// EC2 models tags as a slice of key/value structs with optional fields;
/// entries missing either half are dropped.
pub fn extract_tags<T>(
    tags: &[T],
    key: impl Fn(&T) -> Option<&str>,
    value: impl Fn(&T) -> Option<&str>,
) -> HashMap<String, String> {
    tags.iter()
        .filter_map(|t| match (key(t), value(t)) {
            (Some(k), Some(v)) => Some((k.to_string(), v.to_string())),
            _ => None,
        })
        .collect()
}

/// Convert an EC2 tag slice into a key-to-value map.
pub fn extract_ec2_tags(tags: &[aws_sdk_ec2::types::Tag]) -> HashMap<String, String> {
    extract_tags(tags, |t| t.key(), |t| t.value())
}
