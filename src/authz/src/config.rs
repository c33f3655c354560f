//! Engine configuration
//!
//! Defaults are usable as-is; `EngineConfig::from_env` overlays the
//! `RBAC_AUTHZ_*` environment variables on top of them.

use rbac_core::RelationKind;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AuthzError, Result};

/// Environment variable: granted-permission cache TTL in seconds
pub const ENV_CACHE_TTL: &str = "RBAC_AUTHZ_CACHE_TTL";
/// Environment variable: granted-permission cache capacity (principals)
pub const ENV_CACHE_SIZE: &str = "RBAC_AUTHZ_CACHE_SIZE";
/// Environment variable: comma-separated default relations
pub const ENV_RELATIONS: &str = "RBAC_AUTHZ_RELATIONS";
/// Environment variable: enable metrics collection
pub const ENV_METRICS: &str = "RBAC_AUTHZ_METRICS";

/// Resource access resolver configuration
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Relations resolved when a caller does not name any
    pub relations: Vec<RelationKind>,

    /// Drop provider results for ids that were not in the requested batch
    pub ignore_unrequested_results: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            relations: RelationKind::ALL.to_vec(),
            ignore_unrequested_results: true,
        }
    }
}

/// Granted-permission cache configuration
#[derive(Debug, Clone)]
pub struct PermissionCacheConfig {
    /// Lifetime of a cached permission list
    pub ttl: Duration,

    /// Maximum number of principals kept
    pub capacity: usize,
}

impl Default for PermissionCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            capacity: 10_000,
        }
    }
}

/// Authorization engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Resolver configuration
    pub resolver: ResolverConfig,

    /// Granted-permission cache configuration
    pub permission_cache: PermissionCacheConfig,

    /// Enable metrics collection
    pub enable_metrics: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            resolver: ResolverConfig::default(),
            permission_cache: PermissionCacheConfig::default(),
            enable_metrics: true,
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from an arbitrary lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ttl) = lookup(ENV_CACHE_TTL) {
            let secs: u64 = parse_number(ENV_CACHE_TTL, &ttl)?;
            config.permission_cache.ttl = Duration::from_secs(secs);
        }

        if let Some(size) = lookup(ENV_CACHE_SIZE) {
            config.permission_cache.capacity = parse_number(ENV_CACHE_SIZE, &size)?;
        }

        if let Some(relations) = lookup(ENV_RELATIONS) {
            config.resolver.relations = relations
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(|name| {
                    name.parse::<RelationKind>()
                        .map_err(|e| AuthzError::InvalidConfig(format!("{}: {}", ENV_RELATIONS, e)))
                })
                .collect::<Result<Vec<_>>>()?;
        }

        if let Some(metrics) = lookup(ENV_METRICS) {
            config.enable_metrics = parse_bool(ENV_METRICS, &metrics)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.resolver.relations.is_empty() {
            return Err(AuthzError::InvalidConfig(
                "at least one default relation is required".to_string(),
            ));
        }
        if self.permission_cache.capacity == 0 {
            return Err(AuthzError::InvalidConfig(
                "permission cache capacity must be positive".to_string(),
            ));
        }
        if self.permission_cache.ttl.is_zero() {
            return Err(AuthzError::InvalidConfig(
                "permission cache TTL must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parses into the target width directly, so out-of-range values are
/// rejected rather than truncated
fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AuthzError::InvalidConfig(format!("{}: expected a number, got '{}'", key, value)))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AuthzError::InvalidConfig(format!(
            "{}: expected a boolean, got '{}'",
            key, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.resolver.relations, RelationKind::ALL.to_vec());
        assert!(config.resolver.ignore_unrequested_results);
        assert_eq!(config.permission_cache.ttl, Duration::from_secs(300));
        assert!(config.enable_metrics);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overlay() {
        let config = EngineConfig::from_lookup(lookup(&[
            (ENV_CACHE_TTL, "30"),
            (ENV_CACHE_SIZE, "64"),
            (ENV_RELATIONS, "view, create"),
            (ENV_METRICS, "off"),
        ]))
        .unwrap();

        assert_eq!(config.permission_cache.ttl, Duration::from_secs(30));
        assert_eq!(config.permission_cache.capacity, 64);
        assert_eq!(
            config.resolver.relations,
            vec![RelationKind::View, RelationKind::Create]
        );
        assert!(!config.enable_metrics);
    }

    #[test]
    fn test_invalid_values() {
        let err = EngineConfig::from_lookup(lookup(&[(ENV_CACHE_TTL, "soon")])).unwrap_err();
        assert!(matches!(err, AuthzError::InvalidConfig(_)));

        let err = EngineConfig::from_lookup(lookup(&[(ENV_RELATIONS, "view,share")])).unwrap_err();
        assert!(err.to_string().contains("share"));

        assert!(EngineConfig::from_lookup(lookup(&[(ENV_CACHE_SIZE, "0")])).is_err());
        assert!(EngineConfig::from_lookup(lookup(&[(ENV_RELATIONS, " , ")])).is_err());
        assert!(EngineConfig::from_lookup(lookup(&[(ENV_METRICS, "maybe")])).is_err());
    }

    #[test]
    fn test_cache_size_out_of_range_is_rejected() {
        let too_large = format!("{}0", usize::MAX);
        let err = EngineConfig::from_lookup(lookup(&[(ENV_CACHE_SIZE, too_large.as_str())]))
            .unwrap_err();
        assert!(matches!(err, AuthzError::InvalidConfig(_)));

        let config = EngineConfig::from_lookup(lookup(&[(ENV_CACHE_SIZE, " 4096 ")])).unwrap();
        assert_eq!(config.permission_cache.capacity, 4096);
    }
}
