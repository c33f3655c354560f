//! Contracts for the engine's external collaborators

pub mod access;
pub mod identity;

// Re-export commonly used traits
pub use access::AccessCheckProvider;
pub use identity::ApplicationPermissionProvider;
