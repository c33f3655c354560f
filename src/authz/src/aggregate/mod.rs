//! UI-facing permission aggregation
//!
//! Derives per-resource permission records and aggregate flags from an
//! [`AccessSnapshot`]. Reads are fail-closed: a relation that is pending,
//! failed or was never requested answers `false` everywhere.
//!
//! ```text
//! AccessSnapshot ──► PermissionAggregator ──► has_permission / permissions_for
//!                          │                  any_allowed / root_allowed / flags
//!                          └──► ComposeMemo ──► compose()
//! ```

mod compose;
mod record;

pub use compose::{compose_with_resources, permissions_for, ComposeMemo};
pub use record::{PermissionFlags, PermissionRecord, ResourcePermissions};

use rbac_core::RelationKind;
use std::sync::Arc;
use tracing::trace;

use crate::resolver::AccessSnapshot;

/// Permission queries over one resolver snapshot
///
/// `update` swaps in a newer snapshot while keeping the composition memo.
/// The memo is all-or-nothing: it is reused only while the resource
/// collection and every relation's allowed set keep their identity, and any
/// replaced set recomputes the whole composition.
pub struct PermissionAggregator {
    snapshot: Arc<AccessSnapshot>,
    memo: Arc<ComposeMemo>,
}

impl PermissionAggregator {
    /// Create an aggregator over a snapshot
    pub fn new(snapshot: Arc<AccessSnapshot>) -> Self {
        Self::with_memo(snapshot, Arc::new(ComposeMemo::new()))
    }

    /// Create an aggregator that shares an existing composition memo
    pub fn with_memo(snapshot: Arc<AccessSnapshot>, memo: Arc<ComposeMemo>) -> Self {
        Self { snapshot, memo }
    }

    /// Replace the underlying snapshot
    pub fn update(&mut self, snapshot: Arc<AccessSnapshot>) {
        if !Arc::ptr_eq(&self.snapshot, &snapshot) {
            trace!(
                "Aggregator moving from generation {} to {}",
                self.snapshot.generation(),
                snapshot.generation()
            );
            self.snapshot = snapshot;
        }
    }

    /// Underlying snapshot
    pub fn snapshot(&self) -> &Arc<AccessSnapshot> {
        &self.snapshot
    }

    /// Whether the snapshot still has outstanding relations
    pub fn is_loading(&self) -> bool {
        self.snapshot.is_loading()
    }

    /// Whether `relation` is allowed on `resource_id`
    pub fn has_permission(&self, resource_id: &str, relation: RelationKind) -> bool {
        self.snapshot
            .allowed(relation)
            .is_some_and(|allowed| allowed.contains(resource_id))
    }

    /// Every relation's verdict for `resource_id`
    pub fn permissions_for(&self, resource_id: &str) -> PermissionRecord {
        permissions_for(self.snapshot.sets(), resource_id)
    }

    /// Whether `relation` is allowed on at least one resource
    pub fn any_allowed(&self, relation: RelationKind) -> bool {
        self.snapshot
            .allowed(relation)
            .is_some_and(|allowed| !allowed.is_empty())
    }

    /// Whether `relation` is allowed on the root resource `root_id`
    pub fn root_allowed(&self, relation: RelationKind, root_id: &str) -> bool {
        self.has_permission(root_id, relation)
    }

    /// Aggregate flags for every relation
    pub fn flags(&self, root_id: &str) -> PermissionFlags {
        PermissionFlags {
            any_allowed: PermissionRecord::from_fn(|relation| self.any_allowed(relation)),
            root_allowed: PermissionRecord::from_fn(|relation| self.root_allowed(relation, root_id)),
            is_loading: self.is_loading(),
        }
    }

    /// Every resource of the snapshot with its permission record
    ///
    /// Memoized on the identity of the resource collection and of each
    /// relation's allowed set.
    pub fn compose(&self) -> Arc<[ResourcePermissions]> {
        self.memo
            .get_or_compose(self.snapshot.resources(), self.snapshot.sets())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{AllowedSet, Generation};
    use rbac_core::{ProviderError, Resource};

    fn snapshot() -> Arc<AccessSnapshot> {
        let resources: Arc<[Resource]> = Arc::from(vec![
            Resource::workspace("root"),
            Resource::workspace("a"),
            Resource::workspace("b"),
        ]);
        let batching = AccessSnapshot::batching(
            Generation::new(1),
            vec![RelationKind::View, RelationKind::Edit, RelationKind::Create],
            resources,
        );

        let view: AllowedSet = ["root", "a", "b"].iter().map(|id| id.to_string()).collect();
        let edit: AllowedSet = ["a"].iter().map(|id| id.to_string()).collect();

        Arc::new(
            batching
                .with_relation_outcome(RelationKind::View, Ok(view))
                .with_relation_outcome(RelationKind::Edit, Ok(edit))
                .with_relation_outcome(
                    RelationKind::Create,
                    Err(ProviderError::unavailable("down")),
                ),
        )
    }

    #[test]
    fn test_has_permission() {
        let aggregator = PermissionAggregator::new(snapshot());

        assert!(aggregator.has_permission("a", RelationKind::Edit));
        assert!(!aggregator.has_permission("b", RelationKind::Edit));
        // Never requested
        assert!(!aggregator.has_permission("a", RelationKind::Rename));
        // Failed relation is denied
        assert!(!aggregator.has_permission("a", RelationKind::Create));
    }

    #[test]
    fn test_permissions_for_unknown_id_is_all_false() {
        let aggregator = PermissionAggregator::new(snapshot());
        assert_eq!(aggregator.permissions_for("nope"), PermissionRecord::denied());
    }

    #[test]
    fn test_flags() {
        let aggregator = PermissionAggregator::new(snapshot());
        let flags = aggregator.flags("root");

        assert!(flags.any_allowed.view);
        assert!(flags.any_allowed.edit);
        assert!(!flags.any_allowed.create);
        assert!(flags.root_allowed.view);
        assert!(!flags.root_allowed.edit);
        assert!(!flags.is_loading);
    }

    #[test]
    fn test_compose_memo_survives_identical_update() {
        let snapshot = snapshot();
        let mut aggregator = PermissionAggregator::new(Arc::clone(&snapshot));

        let first = aggregator.compose();
        assert_eq!(first.len(), 3);
        assert!(first[1].permissions.edit);

        // A copied snapshot shares every Arc, so the memo still applies
        aggregator.update(Arc::new((*snapshot).clone()));
        let second = aggregator.compose();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_compose_memo_recomputes_when_any_set_changes() {
        let snapshot = snapshot();
        let mut aggregator = PermissionAggregator::new(Arc::clone(&snapshot));
        let first = aggregator.compose();

        // Only the rename set is new; every other set keeps its identity
        let rename: AllowedSet = ["b"].iter().map(|id| id.to_string()).collect();
        let next = snapshot.with_relation_outcome(RelationKind::Rename, Ok(rename));

        aggregator.update(Arc::new(next));
        let second = aggregator.compose();
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(second[2].permissions.rename);
        assert!(!second[1].permissions.rename);
    }

    #[test]
    fn test_shared_memo_across_aggregators() {
        let snapshot = snapshot();
        let memo = Arc::new(ComposeMemo::new());

        let first =
            PermissionAggregator::with_memo(Arc::clone(&snapshot), Arc::clone(&memo)).compose();
        let second = PermissionAggregator::with_memo(snapshot, Arc::clone(&memo)).compose();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(memo.is_populated());
    }
}
