//! Allowed-set construction from provider responses

use rbac_core::{AccessCheckResult, Resource};
use std::collections::HashSet;
use tracing::debug;

use super::snapshot::AllowedSet;

/// Builds a fresh allowed-id set from one provider response.
///
/// Only entries with `allowed == true` and a non-empty id survive, so an
/// explicit denial and an omitted resource end up the same: absent. With
/// `ignore_unrequested` set, ids that were not part of `requested` are
/// dropped as well.
pub fn build_allowed_set(
    results: Vec<AccessCheckResult>,
    requested: &[Resource],
    ignore_unrequested: bool,
) -> AllowedSet {
    let requested_ids: Option<HashSet<&str>> = ignore_unrequested
        .then(|| requested.iter().map(|resource| resource.id.as_str()).collect());

    results
        .into_iter()
        .filter(|result| result.allowed && result.resource.has_id())
        .filter_map(|result| match &requested_ids {
            Some(ids) if !ids.contains(result.resource.id.as_str()) => {
                debug!("Ignoring result for unrequested resource {}", result.resource);
                None
            }
            _ => Some(result.resource.id),
        })
        .collect()
}
