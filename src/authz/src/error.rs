//! Error types for the authorization engine

use rbac_core::{ProviderError, RelationKind};
use thiserror::Error;

/// Authorization engine errors
#[derive(Debug, Clone, Error)]
pub enum AuthzError {
    /// Access-check provider failed for one relation
    #[error("Access check for relation '{relation}' failed: {source}")]
    Provider {
        relation: RelationKind,
        #[source]
        source: ProviderError,
    },

    /// Identity service could not supply granted permissions
    #[error("Permission lookup for principal '{principal}' failed: {source}")]
    PermissionLookup {
        principal: String,
        #[source]
        source: ProviderError,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;
