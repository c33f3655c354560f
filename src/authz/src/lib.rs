//! # RBAC Authorization Engine
//!
//! Decides which actions a principal may take, in two complementary forms:
//!
//! - **Flat permission matching** ([`matcher`], [`PermissionGate`]):
//!   `<application>:<resourceType>:<action>` strings with `*` wildcards,
//!   used for feature gating
//! - **Resource-scoped relation resolution** ([`ResourceAccessResolver`],
//!   [`PermissionAggregator`]): one batched access-check call per relation
//!   for a whole resource collection, aggregated into per-resource
//!   permission records and UI-facing flags
//!
//! Every decision is fail-closed: malformed permissions only match an
//! identical string, and a resource is allowed only when the provider
//! positively confirms it.
//!
//! ## Example
//!
//! ```rust
//! use rbac_authz::{AuthzEngine, EngineConfig};
//! use rbac_authz::provider::{InMemoryAccessProvider, StaticPermissionProvider};
//! use rbac_core::{RelationKind, Resource};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = AuthzEngine::new(
//!         EngineConfig::default(),
//!         Arc::new(InMemoryAccessProvider::new().grant(RelationKind::Edit, "ws-1")),
//!         Arc::new(StaticPermissionProvider::new().with_principal("alice", ["rbac:*:read"])),
//!     )?;
//!
//!     if engine.gate().has_any("alice", &["rbac:workspace:read"]).await? {
//!         let resolver = engine.resolver();
//!         let resources: Arc<[Resource]> =
//!             Arc::from(vec![Resource::workspace("ws-1"), Resource::workspace("ws-2")]);
//!         resolver.resolve(&[RelationKind::View, RelationKind::Edit], resources);
//!         resolver.settled().await;
//!
//!         let permissions = resolver.aggregator();
//!         assert!(permissions.permissions_for("ws-1").edit);
//!         assert!(!permissions.permissions_for("ws-2").edit);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod metrics;
pub mod permissions;
pub mod provider;
pub mod resolver;
pub mod telemetry;

// Re-export commonly used types
pub use aggregate::{PermissionAggregator, PermissionFlags, PermissionRecord, ResourcePermissions};
pub use config::{EngineConfig, PermissionCacheConfig, ResolverConfig};
pub use engine::AuthzEngine;
pub use error::{AuthzError, Result};
pub use matcher::{evaluate_all, evaluate_any, matches};
pub use permissions::{CheckMode, PermissionGate};
pub use resolver::{AccessSnapshot, Generation, ResolutionPhase, ResourceAccessResolver};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
