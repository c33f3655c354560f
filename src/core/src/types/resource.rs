//! Protected resources

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reporter type used for workspaces managed by the RBAC service
pub const RBAC_REPORTER: &str = "rbac";

/// Resource type of a workspace
pub const WORKSPACE_TYPE: &str = "workspace";

/// System that reports a resource to the access-check service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reporter {
    /// Reporter type (e.g., "rbac")
    #[serde(rename = "type")]
    pub reporter_type: String,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(reporter_type: impl Into<String>) -> Self {
        Self {
            reporter_type: reporter_type.into(),
        }
    }
}

/// An addressable protected entity
///
/// Serialized in the shape access-check services expect:
///
/// ```json
/// {"id": "ws-1", "type": "workspace", "reporter": {"type": "rbac"}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resource {
    /// Resource identifier, non-empty for real resources
    pub id: String,

    /// Resource type (workspace, group, role, ...)
    #[serde(rename = "type")]
    pub resource_type: String,

    /// Reporting system
    pub reporter: Reporter,
}

impl Resource {
    /// Create a new resource
    pub fn new(
        id: impl Into<String>,
        resource_type: impl Into<String>,
        reporter_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            resource_type: resource_type.into(),
            reporter: Reporter::new(reporter_type),
        }
    }

    /// Create a workspace resource reported by RBAC
    pub fn workspace(id: impl Into<String>) -> Self {
        Self::new(id, WORKSPACE_TYPE, RBAC_REPORTER)
    }

    /// Whether this resource carries a usable identifier
    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.reporter.reporter_type, self.resource_type, self.id)
    }
}
