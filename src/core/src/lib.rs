//! # RBAC Core
//!
//! Shared resource model, relation verbs and external-collaborator contracts
//! for the RBAC authorization engine. The engine itself lives in `rbac-authz`;
//! this package only describes what it talks about and who it talks to.

pub mod types;
pub mod traits;
pub mod error;

// Re-export commonly used types
pub use error::{ProviderError, ProviderResult};
pub use types::{AccessCheckResult, RelationKind, Reporter, Resource};
pub use traits::{AccessCheckProvider, ApplicationPermissionProvider};

/// Identifier of a principal as understood by the identity service
pub type PrincipalId = String;

/// Identifier of a protected resource
pub type ResourceId = String;
