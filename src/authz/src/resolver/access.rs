//! Resource access resolver with generation-tagged fan-out
//!
//! Each `resolve` call starts a new generation. Provider calls run as
//! independent tasks, one per relation, and a response is applied only if
//! its generation is still the active one when it arrives.

use futures::FutureExt;
use rbac_core::{AccessCheckProvider, ProviderError, RelationKind, Resource};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::allowed::build_allowed_set;
use super::snapshot::{AccessSnapshot, Generation};
use crate::aggregate::{ComposeMemo, PermissionAggregator};
use crate::config::ResolverConfig;
use crate::metrics::MetricsCollector;

type SnapshotSender = watch::Sender<Arc<AccessSnapshot>>;

/// Resolves per-relation allowed sets for a resource collection
///
/// The resolver owns the latest [`AccessSnapshot`] and replaces it on
/// every visible change:
/// - a new generation enters BATCHING (or settles at once for an empty
///   collection)
/// - each relation's response swaps in a new allowed set
/// - responses from superseded generations are dropped
///
/// Provider calls are spawned onto the ambient Tokio runtime. Outside of a
/// runtime every requested relation fails with
/// [`ProviderError::Unavailable`] instead of staying pending.
pub struct ResourceAccessResolver<P: ?Sized = dyn AccessCheckProvider> {
    /// Access-check backend
    provider: Arc<P>,

    /// Resolver configuration
    config: ResolverConfig,

    /// Latest snapshot, shared with in-flight relation tasks
    state: Arc<SnapshotSender>,

    /// Optional counters
    metrics: Option<MetricsCollector>,

    /// Composition memo shared by every aggregator handed out
    memo: Arc<ComposeMemo>,
}

impl<P> ResourceAccessResolver<P>
where
    P: AccessCheckProvider + ?Sized + 'static,
{
    /// Create a resolver with default configuration
    pub fn new(provider: Arc<P>) -> Self {
        Self::with_config(provider, ResolverConfig::default())
    }

    /// Create a resolver with custom configuration
    pub fn with_config(provider: Arc<P>, config: ResolverConfig) -> Self {
        let (state, _) = watch::channel(Arc::new(AccessSnapshot::initial()));

        debug!(
            "ResourceAccessResolver created with default relations {:?}",
            config.relations
        );

        Self {
            provider,
            config,
            state: Arc::new(state),
            metrics: None,
            memo: Arc::new(ComposeMemo::new()),
        }
    }

    /// Attach a metrics collector
    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Resolver configuration
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Start resolving `relations` for `resources`
    ///
    /// Issues one provider call per distinct relation with the entire
    /// collection. An empty collection settles immediately with an empty
    /// set per relation and no provider call.
    ///
    /// Repeating the active request (same `resources` allocation, same
    /// relations) does not start a new generation; use
    /// [`refresh`](Self::refresh) to force one.
    ///
    /// # Returns
    ///
    /// The generation that now reflects this request
    pub fn resolve(&self, relations: &[RelationKind], resources: Arc<[Resource]>) -> Generation {
        self.start_generation(dedup_relations(relations), resources, false)
    }

    /// Resolve the configured default relations
    pub fn resolve_default(&self, resources: Arc<[Resource]>) -> Generation {
        let relations = dedup_relations(&self.config.relations);
        self.start_generation(relations, resources, false)
    }

    /// Re-issue the active request under a new generation
    ///
    /// Returns [`Generation::INIT`] if nothing has been requested yet.
    pub fn refresh(&self) -> Generation {
        let (relations, resources, generation) = {
            let current = self.state.borrow();
            (
                current.relations().to_vec(),
                Arc::clone(current.resources()),
                current.generation(),
            )
        };

        if generation == Generation::INIT {
            return generation;
        }
        self.start_generation(relations, resources, true)
    }

    /// `resolve` followed by [`settled`](Self::settled)
    pub async fn resolve_and_wait(
        &self,
        relations: &[RelationKind],
        resources: Arc<[Resource]>,
    ) -> Arc<AccessSnapshot> {
        self.resolve(relations, resources);
        self.settled().await
    }

    /// Wait until the latest generation has no outstanding relation
    ///
    /// If `resolve` is called again while waiting, this keeps waiting for
    /// the newer generation, so the returned snapshot is never stale.
    pub async fn settled(&self) -> Arc<AccessSnapshot> {
        let mut receiver = self.state.subscribe();
        let settled = receiver
            .wait_for(|snapshot| !snapshot.is_loading())
            .await
            .map(|snapshot| Arc::clone(&snapshot));

        match settled {
            Ok(snapshot) => snapshot,
            // The sender lives as long as `self`
            Err(_) => self.snapshot(),
        }
    }

    /// Latest snapshot
    pub fn snapshot(&self) -> Arc<AccessSnapshot> {
        Arc::clone(&self.state.borrow())
    }

    /// Aggregator over the latest snapshot
    ///
    /// Aggregators from the same resolver share one composition memo, so
    /// `compose()` is not recomputed while the snapshot's sets are unchanged.
    pub fn aggregator(&self) -> PermissionAggregator {
        PermissionAggregator::with_memo(self.snapshot(), Arc::clone(&self.memo))
    }

    /// Receiver notified on every snapshot replacement
    pub fn subscribe(&self) -> watch::Receiver<Arc<AccessSnapshot>> {
        self.state.subscribe()
    }

    /// Active generation
    pub fn generation(&self) -> Generation {
        self.state.borrow().generation()
    }

    /// Whether the active generation has outstanding relations
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    fn start_generation(
        &self,
        relations: Vec<RelationKind>,
        resources: Arc<[Resource]>,
        force: bool,
    ) -> Generation {
        let mut started = None;
        let short_circuit = resources.is_empty() || relations.is_empty();
        let runtime = Handle::try_current().ok();
        let no_runtime = !short_circuit && runtime.is_none();

        self.state.send_if_modified(|current| {
            let unchanged = current.generation() != Generation::INIT
                && Arc::ptr_eq(current.resources(), &resources)
                && current.relations() == relations.as_slice();
            if unchanged && !force {
                return false;
            }

            let generation = current.generation().next();
            let next = if short_circuit {
                AccessSnapshot::short_circuit(generation, relations.clone(), Arc::clone(&resources))
            } else if no_runtime {
                relations.iter().fold(
                    AccessSnapshot::batching(generation, relations.clone(), Arc::clone(&resources)),
                    |snapshot, relation| {
                        snapshot.with_relation_outcome(
                            *relation,
                            Err(ProviderError::unavailable("no Tokio runtime to run access checks")),
                        )
                    },
                )
            } else {
                AccessSnapshot::batching(generation, relations.clone(), Arc::clone(&resources))
            };
            *current = Arc::new(next);
            started = Some(generation);
            true
        });

        let generation = match started {
            Some(generation) => generation,
            None => {
                debug!("Request unchanged, keeping active generation");
                return self.generation();
            }
        };

        if let Some(metrics) = &self.metrics {
            metrics.record_resolve();
        }

        if short_circuit {
            debug!(
                "Generation {} settled without provider calls ({} resources, {} relations)",
                generation,
                resources.len(),
                relations.len()
            );
            if let Some(metrics) = &self.metrics {
                metrics.record_short_circuit();
            }
            return generation;
        }

        let runtime = match runtime {
            Some(runtime) => runtime,
            None => {
                warn!(
                    "Generation {}: no Tokio runtime, {} relations marked unavailable",
                    generation,
                    relations.len()
                );
                if let Some(metrics) = &self.metrics {
                    for _ in &relations {
                        metrics.record_provider_failure();
                    }
                }
                return generation;
            }
        };

        debug!(
            "Generation {}: checking {} relations against {} resources",
            generation,
            relations.len(),
            resources.len()
        );

        for relation in relations {
            if let Some(metrics) = &self.metrics {
                metrics.record_provider_call(resources.len());
            }

            let check = RelationCheck {
                provider: Arc::clone(&self.provider),
                state: Arc::clone(&self.state),
                metrics: self.metrics.clone(),
                generation,
                relation,
                resources: Arc::clone(&resources),
                ignore_unrequested: self.config.ignore_unrequested_results,
            };
            runtime.spawn(check.run());
        }

        generation
    }
}

/// One relation's provider call for one generation
struct RelationCheck<P: ?Sized> {
    provider: Arc<P>,
    state: Arc<SnapshotSender>,
    metrics: Option<MetricsCollector>,
    generation: Generation,
    relation: RelationKind,
    resources: Arc<[Resource]>,
    ignore_unrequested: bool,
}

impl<P> RelationCheck<P>
where
    P: AccessCheckProvider + ?Sized + 'static,
{
    async fn run(self) {
        let RelationCheck {
            provider,
            state,
            metrics,
            generation,
            relation,
            resources,
            ignore_unrequested,
        } = self;

        // The call itself runs inside the caught future: a provider may panic
        // before it returns its future
        let call = async { provider.check_access(relation, &resources).await };
        let response = AssertUnwindSafe(call)
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(ProviderError::Panicked(panic_message(panic.as_ref()))));

        let outcome = response
            .map(|results| build_allowed_set(results, &resources, ignore_unrequested));

        if let Err(err) = &outcome {
            warn!(
                "Access check for relation '{}' failed in generation {}: {}",
                relation, generation, err
            );
            if let Some(metrics) = &metrics {
                metrics.record_provider_failure();
            }
        }

        let mut applied = false;
        state.send_if_modified(|current| {
            if current.generation() != generation {
                return false;
            }
            *current = Arc::new(current.with_relation_outcome(relation, outcome));
            applied = true;
            true
        });

        if applied {
            debug!("Relation '{}' resolved for generation {}", relation, generation);
        } else {
            debug!(
                "Discarding stale response for relation '{}' (generation {})",
                relation, generation
            );
            if let Some(metrics) = &metrics {
                metrics.record_stale_response();
            }
        }
    }
}

fn dedup_relations(relations: &[RelationKind]) -> Vec<RelationKind> {
    let mut unique = Vec::with_capacity(relations.len());
    for relation in relations {
        if !unique.contains(relation) {
            unique.push(*relation);
        }
    }
    unique
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_relations_keeps_first_occurrence() {
        let relations = [
            RelationKind::Edit,
            RelationKind::View,
            RelationKind::Edit,
            RelationKind::Create,
            RelationKind::View,
        ];
        assert_eq!(
            dedup_relations(&relations),
            vec![RelationKind::Edit, RelationKind::View, RelationKind::Create]
        );
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");

        let payload: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
