//! Flat permission checks for feature gating
//!
//! [`PermissionGate`] fetches a principal's granted permission strings once
//! per cache window and evaluates requirements against them with the
//! wildcard matcher.

mod cache;
mod gate;

pub use cache::{CacheStats, GrantedPermissionCache};
pub use gate::{CheckMode, PermissionGate};
