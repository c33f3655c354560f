//! In-memory access-check provider

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use rbac_core::{
    AccessCheckProvider, AccessCheckResult, ProviderError, ProviderResult, RelationKind, Resource,
};
use std::collections::{HashMap, HashSet};

/// One recorded `check_access` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCall {
    pub relation: RelationKind,
    pub batch_size: usize,
}

/// Access-check provider backed by a grant table
///
/// By default only allowed resources are returned and denied ones are
/// omitted; `with_explicit_denials` makes it emit `allowed: false` entries
/// instead.
#[derive(Debug, Default)]
pub struct InMemoryAccessProvider {
    grants: RwLock<HashMap<RelationKind, HashSet<String>>>,
    failures: RwLock<HashMap<RelationKind, ProviderError>>,
    explicit_denials: bool,
    calls: Mutex<Vec<ProviderCall>>,
}

impl InMemoryAccessProvider {
    /// Create a provider that denies everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `relation` on `resource_id`
    pub fn grant(self, relation: RelationKind, resource_id: impl Into<String>) -> Self {
        self.set_grant(relation, resource_id, true);
        self
    }

    /// Grant `relation` on every id in `resource_ids`
    pub fn grant_all<I, S>(self, relation: RelationKind, resource_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for resource_id in resource_ids {
            self.set_grant(relation, resource_id, true);
        }
        self
    }

    /// Emit explicit `allowed: false` results for denied resources
    pub fn with_explicit_denials(mut self) -> Self {
        self.explicit_denials = true;
        self
    }

    /// Fail every check of `relation` with `error`
    pub fn failing(self, relation: RelationKind, error: ProviderError) -> Self {
        self.set_failure(relation, Some(error));
        self
    }

    /// Change a grant at runtime
    pub fn set_grant(&self, relation: RelationKind, resource_id: impl Into<String>, allowed: bool) {
        let mut grants = self.grants.write();
        let ids = grants.entry(relation).or_default();
        let resource_id = resource_id.into();
        if allowed {
            ids.insert(resource_id);
        } else {
            ids.remove(&resource_id);
        }
    }

    /// Set or clear a forced failure at runtime
    pub fn set_failure(&self, relation: RelationKind, error: Option<ProviderError>) {
        let mut failures = self.failures.write();
        match error {
            Some(error) => {
                failures.insert(relation, error);
            }
            None => {
                failures.remove(&relation);
            }
        }
    }

    /// Every call received so far
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().clone()
    }

    /// Number of calls received so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn is_granted(&self, relation: RelationKind, resource_id: &str) -> bool {
        self.grants
            .read()
            .get(&relation)
            .is_some_and(|ids| ids.contains(resource_id))
    }
}

#[async_trait]
impl AccessCheckProvider for InMemoryAccessProvider {
    async fn check_access(
        &self,
        relation: RelationKind,
        resources: &[Resource],
    ) -> ProviderResult<Vec<AccessCheckResult>> {
        self.calls.lock().push(ProviderCall {
            relation,
            batch_size: resources.len(),
        });

        if let Some(error) = self.failures.read().get(&relation) {
            return Err(error.clone());
        }

        let results = resources
            .iter()
            .filter_map(|resource| {
                let allowed = self.is_granted(relation, &resource.id);
                if allowed || self.explicit_denials {
                    Some(AccessCheckResult {
                        resource: resource.clone(),
                        allowed,
                    })
                } else {
                    None
                }
            })
            .collect();

        Ok(results)
    }
}
