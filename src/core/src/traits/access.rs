//! Relation-scoped access checks

use crate::error::ProviderResult;
use crate::types::{AccessCheckResult, RelationKind, Resource};
use async_trait::async_trait;

/// Service that decides, per resource, whether a relation holds for the
/// current principal.
///
/// Callers always pass a non-empty batch. Implementations return at most
/// one result per input resource and may omit resources; the engine treats
/// an omitted resource as denied.
#[async_trait]
pub trait AccessCheckProvider: Send + Sync {
    /// Check one relation against a whole batch of resources
    async fn check_access(
        &self,
        relation: RelationKind,
        resources: &[Resource],
    ) -> ProviderResult<Vec<AccessCheckResult>>;
}
