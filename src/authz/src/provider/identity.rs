//! Static application permission provider

use async_trait::async_trait;
use parking_lot::RwLock;
use rbac_core::{ApplicationPermissionProvider, ProviderError, ProviderResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Identity provider serving fixed permission lists per principal
///
/// Unknown principals have no permissions.
#[derive(Debug, Default)]
pub struct StaticPermissionProvider {
    permissions: RwLock<HashMap<String, Vec<String>>>,
    failure: RwLock<Option<ProviderError>>,
    fetches: AtomicUsize,
}

impl StaticPermissionProvider {
    /// Create an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign permissions to a principal
    pub fn with_principal<I, S>(self, principal: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_permissions(principal, permissions);
        self
    }

    /// Replace the permissions of a principal at runtime
    pub fn set_permissions<I, S>(&self, principal: impl Into<String>, permissions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions.write().insert(
            principal.into(),
            permissions.into_iter().map(Into::into).collect(),
        );
    }

    /// Set or clear a forced failure
    pub fn set_failure(&self, error: Option<ProviderError>) {
        *self.failure.write() = error;
    }

    /// Number of fetches served, failures included
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ApplicationPermissionProvider for StaticPermissionProvider {
    async fn granted_permissions(&self, principal_id: &str) -> ProviderResult<Vec<String>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.failure.read().clone() {
            return Err(error);
        }

        Ok(self
            .permissions
            .read()
            .get(principal_id)
            .cloned()
            .unwrap_or_default())
    }
}
