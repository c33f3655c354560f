//! Feature gate over granted application permissions

use rbac_core::ApplicationPermissionProvider;
use std::sync::Arc;
use tracing::{debug, warn};

use super::cache::GrantedPermissionCache;
use crate::config::PermissionCacheConfig;
use crate::error::{AuthzError, Result};
use crate::matcher;
use crate::metrics::MetricsCollector;

/// How a list of required permissions is combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckMode {
    /// At least one requirement satisfied; an empty list is `false`
    #[default]
    Any,
    /// Every requirement satisfied; an empty list is `true`
    All,
}

/// Evaluates required permissions against a principal's grants
pub struct PermissionGate<P: ?Sized = dyn ApplicationPermissionProvider> {
    provider: Arc<P>,
    cache: GrantedPermissionCache,
    metrics: Option<MetricsCollector>,
}

impl<P> PermissionGate<P>
where
    P: ApplicationPermissionProvider + ?Sized,
{
    /// Create a gate with default cache settings
    pub fn new(provider: Arc<P>) -> Self {
        Self::with_config(provider, &PermissionCacheConfig::default())
    }

    /// Create a gate with custom cache settings
    pub fn with_config(provider: Arc<P>, config: &PermissionCacheConfig) -> Self {
        Self {
            provider,
            cache: GrantedPermissionCache::new(config),
            metrics: None,
        }
    }

    /// Attach a metrics collector
    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Granted permissions of a principal, fetched at most once per window
    ///
    /// Failed lookups are not cached.
    pub async fn granted(&self, principal: &str) -> Result<Arc<[String]>> {
        let cached = self.cache.get(principal);
        if let Some(metrics) = &self.metrics {
            metrics.record_permission_lookup(cached.is_some());
        }
        if let Some(permissions) = cached {
            return Ok(permissions);
        }

        let permissions: Arc<[String]> = self
            .provider
            .granted_permissions(principal)
            .await
            .map_err(|source| {
                warn!("Permission lookup for {} failed: {}", principal, source);
                AuthzError::PermissionLookup {
                    principal: principal.to_string(),
                    source,
                }
            })?
            .into();

        debug!(
            "Fetched {} granted permissions for {}",
            permissions.len(),
            principal
        );
        self.cache.insert(principal, Arc::clone(&permissions));
        Ok(permissions)
    }

    /// Evaluate `required` for a principal in the given mode
    pub async fn check<R>(&self, principal: &str, required: &[R], mode: CheckMode) -> Result<bool>
    where
        R: AsRef<str> + Sync,
    {
        let granted = self.granted(principal).await?;
        let allowed = match mode {
            CheckMode::Any => matcher::evaluate_any(required, &granted),
            CheckMode::All => matcher::evaluate_all(required, &granted),
        };

        debug!(
            "Permission check for {} ({:?}, {} required): {}",
            principal,
            mode,
            required.len(),
            if allowed { "ALLOW" } else { "DENY" }
        );
        Ok(allowed)
    }

    /// Whether any of `required` is granted
    pub async fn has_any<R>(&self, principal: &str, required: &[R]) -> Result<bool>
    where
        R: AsRef<str> + Sync,
    {
        self.check(principal, required, CheckMode::Any).await
    }

    /// Whether all of `required` are granted
    pub async fn has_all<R>(&self, principal: &str, required: &[R]) -> Result<bool>
    where
        R: AsRef<str> + Sync,
    {
        self.check(principal, required, CheckMode::All).await
    }

    /// Drop the cached grants of a principal
    pub fn invalidate(&self, principal: &str) -> bool {
        self.cache.invalidate(principal)
    }

    /// Granted-permission cache
    pub fn cache(&self) -> &GrantedPermissionCache {
        &self.cache
    }
}
