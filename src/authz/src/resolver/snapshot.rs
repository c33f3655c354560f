//! Immutable resolution state published by the resolver
//!
//! Every visible change produces a new `AccessSnapshot` behind a new `Arc`,
//! and a relation's allowed set is only ever replaced, never patched.

use rbac_core::{ProviderError, RelationKind, Resource};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::error::{AuthzError, Result};

/// Resource ids for which one relation is allowed
pub type AllowedSet = HashSet<String>;

/// Allowed sets keyed by relation
pub type RelationSets = HashMap<RelationKind, Arc<AllowedSet>>;

/// Monotonically increasing tag identifying one `resolve` request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    /// Generation of a resolver that has not been asked anything yet
    pub const INIT: Generation = Generation(0);

    /// Create a generation tag
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw counter value
    pub fn value(&self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Aggregate phase of one resolution cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPhase {
    /// Nothing requested yet
    Init,
    /// Provider calls outstanding for the current generation
    Batching,
    /// Every requested relation resolved
    Resolved,
    /// Every call finished and at least one relation failed
    Errored,
}

/// State of a single relation within the current generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationStatus {
    /// Relation was not part of the current request
    NotRequested,
    /// Provider call outstanding
    Pending,
    /// Allowed set built from the provider response
    Resolved,
    /// Provider call failed
    Failed(ProviderError),
}

/// Point-in-time view of the resolver state for one generation
#[derive(Debug, Clone)]
pub struct AccessSnapshot {
    generation: Generation,
    resources: Arc<[Resource]>,
    relations: Vec<RelationKind>,
    sets: RelationSets,
    errors: HashMap<RelationKind, ProviderError>,
    pending: HashSet<RelationKind>,
}

impl AccessSnapshot {
    pub(crate) fn initial() -> Self {
        Self {
            generation: Generation::INIT,
            resources: Arc::from(Vec::new()),
            relations: Vec::new(),
            sets: RelationSets::new(),
            errors: HashMap::new(),
            pending: HashSet::new(),
        }
    }

    /// All relations outstanding
    pub(crate) fn batching(
        generation: Generation,
        relations: Vec<RelationKind>,
        resources: Arc<[Resource]>,
    ) -> Self {
        let pending = relations.iter().copied().collect();
        Self {
            generation,
            resources,
            relations,
            sets: RelationSets::new(),
            errors: HashMap::new(),
            pending,
        }
    }

    /// Settled without asking anyone: every relation maps to an empty set
    pub(crate) fn short_circuit(
        generation: Generation,
        relations: Vec<RelationKind>,
        resources: Arc<[Resource]>,
    ) -> Self {
        let sets = relations
            .iter()
            .map(|relation| (*relation, Arc::new(AllowedSet::new())))
            .collect();
        Self {
            generation,
            resources,
            relations,
            sets,
            errors: HashMap::new(),
            pending: HashSet::new(),
        }
    }

    /// Successor snapshot with one relation's outcome applied
    pub(crate) fn with_relation_outcome(
        &self,
        relation: RelationKind,
        outcome: std::result::Result<AllowedSet, ProviderError>,
    ) -> Self {
        let mut next = self.clone();
        next.pending.remove(&relation);

        match outcome {
            Ok(allowed) => {
                next.errors.remove(&relation);
                next.sets.insert(relation, Arc::new(allowed));
            }
            Err(err) => {
                next.sets.remove(&relation);
                next.errors.insert(relation, err);
            }
        }

        next
    }

    /// Generation this snapshot belongs to
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Resource collection of the current request
    pub fn resources(&self) -> &Arc<[Resource]> {
        &self.resources
    }

    /// Relations of the current request, deduplicated, in request order
    pub fn relations(&self) -> &[RelationKind] {
        &self.relations
    }

    /// Allowed sets of every relation resolved so far
    pub fn sets(&self) -> &RelationSets {
        &self.sets
    }

    /// Allowed set for a relation, if it has resolved
    pub fn allowed(&self, relation: RelationKind) -> Option<&Arc<AllowedSet>> {
        self.sets.get(&relation)
    }

    /// Allowed set for a relation, distinguishing a failed check from a
    /// pending or unrequested one
    ///
    /// # Returns
    ///
    /// `Ok(Some(set))` when resolved, `Ok(None)` when pending or not
    /// requested, and `Err(AuthzError::Provider)` when the check failed
    pub fn try_allowed(&self, relation: RelationKind) -> Result<Option<&Arc<AllowedSet>>> {
        if let Some(err) = self.errors.get(&relation) {
            return Err(AuthzError::Provider {
                relation,
                source: err.clone(),
            });
        }
        Ok(self.sets.get(&relation))
    }

    /// Provider failure for a relation, if any
    pub fn error(&self, relation: RelationKind) -> Option<&ProviderError> {
        self.errors.get(&relation)
    }

    /// Every provider failure of this generation
    pub fn errors(&self) -> &HashMap<RelationKind, ProviderError> {
        &self.errors
    }

    /// Whether any relation of this generation is still outstanding
    pub fn is_loading(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Aggregate phase
    pub fn phase(&self) -> ResolutionPhase {
        if self.generation == Generation::INIT {
            ResolutionPhase::Init
        } else if self.is_loading() {
            ResolutionPhase::Batching
        } else if !self.errors.is_empty() {
            ResolutionPhase::Errored
        } else {
            ResolutionPhase::Resolved
        }
    }

    /// State of a single relation
    pub fn status(&self, relation: RelationKind) -> RelationStatus {
        if self.pending.contains(&relation) {
            RelationStatus::Pending
        } else if let Some(err) = self.errors.get(&relation) {
            RelationStatus::Failed(err.clone())
        } else if self.sets.contains_key(&relation) {
            RelationStatus::Resolved
        } else {
            RelationStatus::NotRequested
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resources() -> Arc<[Resource]> {
        Arc::from(vec![Resource::workspace("a"), Resource::workspace("b")])
    }

    #[test]
    fn test_initial_snapshot() {
        let snapshot = AccessSnapshot::initial();
        assert_eq!(snapshot.generation(), Generation::INIT);
        assert_eq!(snapshot.phase(), ResolutionPhase::Init);
        assert!(!snapshot.is_loading());
        assert_eq!(snapshot.status(RelationKind::View), RelationStatus::NotRequested);
    }

    #[test]
    fn test_outcomes_replace_sets() {
        let relations = vec![RelationKind::View, RelationKind::Edit];
        let snapshot = AccessSnapshot::batching(Generation::new(1), relations, resources());
        assert_eq!(snapshot.phase(), ResolutionPhase::Batching);
        assert_eq!(snapshot.status(RelationKind::Edit), RelationStatus::Pending);

        let view: AllowedSet = ["a".to_string()].into_iter().collect();
        let next = snapshot.with_relation_outcome(RelationKind::View, Ok(view));
        assert!(next.is_loading());
        assert_eq!(next.status(RelationKind::View), RelationStatus::Resolved);
        // The predecessor is untouched
        assert!(snapshot.allowed(RelationKind::View).is_none());

        let failed = next.with_relation_outcome(
            RelationKind::Edit,
            Err(ProviderError::unavailable("down")),
        );
        assert!(!failed.is_loading());
        assert_eq!(failed.phase(), ResolutionPhase::Errored);
        assert!(failed.try_allowed(RelationKind::Edit).is_err());
        assert!(failed.try_allowed(RelationKind::View).unwrap().is_some());

        // Unchanged relations keep their set identity
        assert!(Arc::ptr_eq(
            next.allowed(RelationKind::View).unwrap(),
            failed.allowed(RelationKind::View).unwrap(),
        ));
    }

    #[test]
    fn test_short_circuit_snapshot() {
        let snapshot = AccessSnapshot::short_circuit(
            Generation::new(1),
            vec![RelationKind::Create],
            Arc::from(Vec::new()),
        );
        assert!(!snapshot.is_loading());
        assert_eq!(snapshot.phase(), ResolutionPhase::Resolved);
        assert!(snapshot.allowed(RelationKind::Create).unwrap().is_empty());
    }
}
