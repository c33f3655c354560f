//! Shared types for the RBAC authorization engine

pub mod resource;
pub mod relation;
pub mod check;

// Re-export commonly used types
pub use resource::{Reporter, Resource};
pub use relation::{ParseRelationError, RelationKind};
pub use check::AccessCheckResult;
