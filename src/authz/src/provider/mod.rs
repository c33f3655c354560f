//! In-memory implementations of the provider contracts
//!
//! Useful for tests, local development and as a reference for what the
//! engine expects from real access-check and identity services.

mod access;
mod identity;

pub use access::{InMemoryAccessProvider, ProviderCall};
pub use identity::StaticPermissionProvider;
