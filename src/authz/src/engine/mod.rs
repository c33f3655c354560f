//! Authorization engine facade
//!
//! Wires configuration, providers and metrics into the two entry points a
//! consumer needs: the flat [`PermissionGate`] and per-view
//! [`ResourceAccessResolver`]s.
//!
//! ```text
//!                 ┌──► PermissionGate ──► GrantedPermissionCache ──► matcher
//! AuthzEngine ────┤
//!                 └──► ResourceAccessResolver (one per resource view)
//!                            │ one call per relation
//!                            ▼
//!                     AccessCheckProvider ──► AccessSnapshot ──► PermissionAggregator
//! ```

use rbac_core::{AccessCheckProvider, ApplicationPermissionProvider};
use std::sync::Arc;
use tracing::info;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::metrics::{EngineMetrics, MetricsCollector};
use crate::permissions::PermissionGate;
use crate::resolver::ResourceAccessResolver;

/// Authorization engine
pub struct AuthzEngine {
    /// Flat permission gate shared by all callers
    gate: PermissionGate,

    /// Access-check backend handed to every resolver
    access_provider: Arc<dyn AccessCheckProvider>,

    /// Engine metrics, if enabled
    metrics: Option<MetricsCollector>,

    /// Engine configuration
    config: EngineConfig,
}

impl AuthzEngine {
    /// Create an engine from validated configuration
    pub fn new(
        config: EngineConfig,
        access_provider: Arc<dyn AccessCheckProvider>,
        permission_provider: Arc<dyn ApplicationPermissionProvider>,
    ) -> Result<Self> {
        config.validate()?;

        let metrics = config.enable_metrics.then(MetricsCollector::new);

        let mut gate = PermissionGate::with_config(permission_provider, &config.permission_cache);
        if let Some(metrics) = &metrics {
            gate = gate.with_metrics(metrics.clone());
        }

        info!(
            "AuthzEngine initialized with cache_ttl={:?}, cache_capacity={}, metrics={}",
            config.permission_cache.ttl, config.permission_cache.capacity, config.enable_metrics
        );

        Ok(Self {
            gate,
            access_provider,
            metrics,
            config,
        })
    }

    /// Flat permission gate
    pub fn gate(&self) -> &PermissionGate {
        &self.gate
    }

    /// New resolver for one resource collection view
    pub fn resolver(&self) -> ResourceAccessResolver {
        let resolver = ResourceAccessResolver::with_config(
            Arc::clone(&self.access_provider),
            self.config.resolver.clone(),
        );
        match &self.metrics {
            Some(metrics) => resolver.with_metrics(metrics.clone()),
            None => resolver,
        }
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current metrics, if enabled
    pub fn get_metrics(&self) -> Option<EngineMetrics> {
        self.metrics.as_ref().map(MetricsCollector::get_metrics)
    }
}
