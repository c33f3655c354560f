//! Batched, resource-scoped relation resolution
//!
//! The resolver asks the access-check provider once per relation for the
//! whole resource collection, turns each response into an allowed-id set and
//! publishes the result as an immutable [`AccessSnapshot`].
//!
//! # Examples
//!
//! ```
//! use rbac_authz::provider::InMemoryAccessProvider;
//! use rbac_authz::resolver::ResourceAccessResolver;
//! use rbac_core::{RelationKind, Resource};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let provider = Arc::new(InMemoryAccessProvider::new().grant(RelationKind::Edit, "ws-1"));
//! let resolver = ResourceAccessResolver::new(provider);
//!
//! let resources: Arc<[Resource]> =
//!     Arc::from(vec![Resource::workspace("ws-1"), Resource::workspace("ws-2")]);
//! let snapshot = resolver.resolve_and_wait(&[RelationKind::Edit], resources).await;
//!
//! let edit = snapshot.allowed(RelationKind::Edit).unwrap();
//! assert!(edit.contains("ws-1"));
//! assert!(!edit.contains("ws-2"));
//! # }
//! ```

mod allowed;
mod access;
mod snapshot;

pub use allowed::build_allowed_set;
pub use access::ResourceAccessResolver;
pub use snapshot::{
    AccessSnapshot, AllowedSet, Generation, RelationSets, RelationStatus, ResolutionPhase,
};
