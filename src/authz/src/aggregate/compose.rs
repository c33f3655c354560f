//! Resource/permission composition and its identity-keyed memo

use parking_lot::Mutex;
use rbac_core::{RelationKind, Resource};
use std::sync::Arc;
use tracing::trace;

use super::record::{PermissionRecord, ResourcePermissions};
use crate::resolver::{AllowedSet, RelationSets};

/// Permission record for one resource id
///
/// Relations without a resolved set are `false`.
pub fn permissions_for(sets: &RelationSets, resource_id: &str) -> PermissionRecord {
    PermissionRecord::from_fn(|relation| {
        sets.get(&relation)
            .is_some_and(|allowed| allowed.contains(resource_id))
    })
}

/// Pairs every resource with its permission record
///
/// Pure: equal inputs always give an equal output.
pub fn compose_with_resources(
    resources: &[Resource],
    sets: &RelationSets,
) -> Vec<ResourcePermissions> {
    resources
        .iter()
        .map(|resource| ResourcePermissions {
            resource: resource.clone(),
            permissions: permissions_for(sets, &resource.id),
        })
        .collect()
}

/// Identity of one composition input
struct ComposeKey {
    resources: Arc<[Resource]>,
    sets: Vec<(RelationKind, Arc<AllowedSet>)>,
}

impl ComposeKey {
    fn new(resources: &Arc<[Resource]>, sets: &RelationSets) -> Self {
        let mut sets: Vec<_> = sets
            .iter()
            .map(|(relation, allowed)| (*relation, Arc::clone(allowed)))
            .collect();
        sets.sort_by_key(|(relation, _)| *relation);

        Self {
            resources: Arc::clone(resources),
            sets,
        }
    }

    /// Same allocations, not merely equal contents
    fn is_same(&self, other: &ComposeKey) -> bool {
        Arc::ptr_eq(&self.resources, &other.resources)
            && self.sets.len() == other.sets.len()
            && self
                .sets
                .iter()
                .zip(other.sets.iter())
                .all(|((a, a_set), (b, b_set))| a == b && Arc::ptr_eq(a_set, b_set))
    }
}

/// Memo of the last composition, keyed by the identity of its inputs
///
/// Holding the key's `Arc`s keeps the allocations alive, so a pointer
/// cannot be reused by an unrelated collection while it is cached.
#[derive(Default)]
pub struct ComposeMemo {
    last: Mutex<Option<(ComposeKey, Arc<[ResourcePermissions]>)>>,
}

impl ComposeMemo {
    /// Create an empty memo
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached composition for these inputs, computing it on a miss
    pub fn get_or_compose(
        &self,
        resources: &Arc<[Resource]>,
        sets: &RelationSets,
    ) -> Arc<[ResourcePermissions]> {
        let key = ComposeKey::new(resources, sets);
        let mut last = self.last.lock();

        if let Some((cached_key, composed)) = last.as_ref() {
            if cached_key.is_same(&key) {
                trace!("Composition memo hit");
                return Arc::clone(composed);
            }
        }

        trace!("Composition memo miss, composing {} resources", resources.len());
        let composed: Arc<[ResourcePermissions]> =
            Arc::from(compose_with_resources(resources, sets));
        *last = Some((key, Arc::clone(&composed)));
        composed
    }

    /// Drop the cached composition
    pub fn clear(&self) {
        *self.last.lock() = None;
    }

    /// Whether a composition is cached
    pub fn is_populated(&self) -> bool {
        self.last.lock().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sets(edit: &[&str]) -> RelationSets {
        let allowed: AllowedSet = edit.iter().map(|id| id.to_string()).collect();
        let mut sets = RelationSets::new();
        sets.insert(RelationKind::Edit, Arc::new(allowed));
        sets
    }

    fn resources() -> Arc<[Resource]> {
        Arc::from(vec![Resource::workspace("a"), Resource::workspace("b")])
    }

    #[test]
    fn test_compose_with_resources() {
        let composed = compose_with_resources(&resources(), &sets(&["a"]));

        assert_eq!(composed.len(), 2);
        assert!(composed[0].permissions.edit);
        assert!(!composed[0].permissions.view);
        assert!(!composed[1].permissions.edit);
    }

    #[test]
    fn test_compose_is_deterministic() {
        let resources = resources();
        let sets = sets(&["b"]);
        assert_eq!(
            compose_with_resources(&resources, &sets),
            compose_with_resources(&resources, &sets)
        );
    }

    #[test]
    fn test_memo_hits_on_same_identity() {
        let memo = ComposeMemo::new();
        let resources = resources();
        let sets = sets(&["a"]);

        let first = memo.get_or_compose(&resources, &sets);
        let second = memo.get_or_compose(&resources, &sets.clone());
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_memo_invalidates_on_new_identity() {
        let memo = ComposeMemo::new();
        let resources = resources();

        let first = memo.get_or_compose(&resources, &sets(&["a"]));
        // Equal contents, new allocation
        let second = memo.get_or_compose(&resources, &sets(&["a"]));
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);

        let copied: Arc<[Resource]> = Arc::from(resources.to_vec());
        let sets = sets(&["a"]);
        let third = memo.get_or_compose(&resources, &sets);
        let fourth = memo.get_or_compose(&copied, &sets);
        assert!(!Arc::ptr_eq(&third, &fourth));

        memo.clear();
        assert!(!memo.is_populated());
    }
}
