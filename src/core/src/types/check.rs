//! Access-check outcomes

use serde::{Deserialize, Serialize};

use super::resource::Resource;

/// Outcome of one (relation, resource) evaluation returned by a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessCheckResult {
    /// Resource the decision applies to
    pub resource: Resource,

    /// Whether the relation holds for the current principal
    pub allowed: bool,
}

impl AccessCheckResult {
    /// Allowed outcome
    pub fn allow(resource: Resource) -> Self {
        Self {
            resource,
            allowed: true,
        }
    }

    /// Denied outcome
    pub fn deny(resource: Resource) -> Self {
        Self {
            resource,
            allowed: false,
        }
    }
}
