//! Counters for resolver and permission-gate observability

use parking_lot::RwLock;
use std::sync::Arc;

/// Engine counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineMetrics {
    /// Number of `resolve` calls that started a new generation
    pub resolve_calls: u64,

    /// Number of provider calls issued (one per relation per generation)
    pub provider_calls: u64,

    /// Number of provider calls that failed
    pub provider_failures: u64,

    /// Provider responses dropped because a newer generation was active
    pub stale_responses: u64,

    /// Generations settled without any provider call
    pub short_circuits: u64,

    /// Total resources sent to the provider across all calls
    pub resources_checked: u64,

    /// Granted-permission cache hits
    pub permission_cache_hits: u64,

    /// Granted-permission cache misses
    pub permission_cache_misses: u64,
}

impl EngineMetrics {
    /// Average number of resources per provider call
    pub fn avg_batch_size(&self) -> f64 {
        if self.provider_calls == 0 {
            0.0
        } else {
            self.resources_checked as f64 / self.provider_calls as f64
        }
    }

    /// Fraction of provider calls that failed
    pub fn failure_rate(&self) -> f64 {
        if self.provider_calls == 0 {
            0.0
        } else {
            self.provider_failures as f64 / self.provider_calls as f64
        }
    }
}

/// Shared metrics collector
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    metrics: Arc<RwLock<EngineMetrics>>,
}

impl MetricsCollector {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a `resolve` call that started a new generation
    pub fn record_resolve(&self) {
        self.metrics.write().resolve_calls += 1;
    }

    /// Record a generation settled without provider calls
    pub fn record_short_circuit(&self) {
        self.metrics.write().short_circuits += 1;
    }

    /// Record a provider call for a batch of `batch_size` resources
    pub fn record_provider_call(&self, batch_size: usize) {
        let mut metrics = self.metrics.write();
        metrics.provider_calls += 1;
        metrics.resources_checked += batch_size as u64;
    }

    /// Record a failed provider call
    pub fn record_provider_failure(&self) {
        self.metrics.write().provider_failures += 1;
    }

    /// Record a discarded stale response
    pub fn record_stale_response(&self) {
        self.metrics.write().stale_responses += 1;
    }

    /// Record a granted-permission cache lookup
    pub fn record_permission_lookup(&self, hit: bool) {
        let mut metrics = self.metrics.write();
        if hit {
            metrics.permission_cache_hits += 1;
        } else {
            metrics.permission_cache_misses += 1;
        }
    }

    /// Current counter values
    pub fn get_metrics(&self) -> EngineMetrics {
        self.metrics.read().clone()
    }

    /// Reset all counters
    pub fn reset(&self) {
        *self.metrics.write() = EngineMetrics::default();
    }
}
