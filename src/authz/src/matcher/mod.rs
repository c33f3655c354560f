//! Flat wildcard permission matching
//!
//! Permission strings have exactly three colon-separated components,
//! `<application>:<resourceType>:<action>`. A granted permission may use the
//! literal `*` in the resource type and action positions; the application
//! is always compared literally.
//!
//! Evaluation is total: byte-equal strings always match, and otherwise a
//! string that does not parse never matches anything.
//!
//! # Examples
//!
//! ```
//! use rbac_authz::matcher::{evaluate_all, evaluate_any, matches};
//!
//! assert!(matches("rbac:*:*", "rbac:role:read"));
//! assert!(!matches("rbac:group:read", "rbac:group:write"));
//!
//! let granted = ["rbac:group:read", "inventory:*:read"];
//! assert!(evaluate_any(&["rbac:group:write", "inventory:hosts:read"], &granted));
//! assert!(!evaluate_all(&["rbac:group:write", "inventory:hosts:read"], &granted));
//! ```

mod permission;

#[cfg(test)]
mod tests;

pub use permission::{Permission, PermissionParseError, COMPONENT_COUNT, WILDCARD};

use tracing::trace;

/// Whether `granted` satisfies `required`.
///
/// Byte-equal strings match without parsing. Otherwise malformed input on
/// either side is a non-match.
pub fn matches(granted: &str, required: &str) -> bool {
    if granted == required {
        return true;
    }

    match (Permission::parse(granted), Permission::parse(required)) {
        (Ok(granted), Ok(required)) => granted.grants(&required),
        (Err(err), _) | (_, Err(err)) => {
            trace!("Malformed permission treated as non-match: {}", err);
            false
        }
    }
}

/// Whether any required permission is satisfied by any granted permission.
///
/// An empty `required` list is `false`: there is nothing to satisfy.
pub fn evaluate_any<R, G>(required: &[R], granted: &[G]) -> bool
where
    R: AsRef<str>,
    G: AsRef<str>,
{
    required
        .iter()
        .any(|required| is_granted(required.as_ref(), granted))
}

/// Whether every required permission is satisfied by some granted permission.
///
/// An empty `required` list is `true`: no requirement is unmet.
pub fn evaluate_all<R, G>(required: &[R], granted: &[G]) -> bool
where
    R: AsRef<str>,
    G: AsRef<str>,
{
    required
        .iter()
        .all(|required| is_granted(required.as_ref(), granted))
}

fn is_granted<G: AsRef<str>>(required: &str, granted: &[G]) -> bool {
    granted
        .iter()
        .any(|granted| matches(granted.as_ref(), required))
}
