//! Granted application permissions

use crate::error::ProviderResult;
use async_trait::async_trait;

/// Identity/session service that supplies the flat permission strings
/// granted to a principal (`<application>:<resourceType>:<action>`).
///
/// Authentication and upstream caching happen before this call.
#[async_trait]
pub trait ApplicationPermissionProvider: Send + Sync {
    /// Fetch the ordered permission list for a principal
    async fn granted_permissions(&self, principal_id: &str) -> ProviderResult<Vec<String>>;
}
