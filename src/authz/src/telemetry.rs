//! Tracing subscriber setup

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AuthzError, Result};

/// Install a global fmt subscriber
///
/// `RUST_LOG` takes precedence; `default_filter` (e.g. `"rbac_authz=info"`)
/// applies when it is unset. Fails instead of panicking if a global
/// subscriber is already installed.
pub fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| AuthzError::InvalidConfig(format!("tracing filter: {}", e)))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| AuthzError::InvalidConfig(format!("tracing subscriber: {}", e)))
}
