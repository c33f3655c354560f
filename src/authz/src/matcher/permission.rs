//! Parsed permission strings
//!
//! A `Permission` borrows its components from the source string, so parsing
//! on every comparison costs a split and nothing else.

use std::fmt;
use thiserror::Error;

/// Wildcard token accepted in the resource type and action positions
pub const WILDCARD: &str = "*";

/// Number of components in a well-formed permission string
pub const COMPONENT_COUNT: usize = 3;

/// Errors that can occur while parsing a permission string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionParseError {
    /// Permission string does not have exactly three components
    #[error("Expected 3 components in '{raw}', found {found}")]
    ComponentCount { raw: String, found: usize },
}

/// A `<application>:<resourceType>:<action>` permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Permission<'a> {
    application: &'a str,
    resource_type: &'a str,
    action: &'a str,
}

impl<'a> Permission<'a> {
    /// Parses a permission string
    ///
    /// # Returns
    ///
    /// Returns an error if the string does not split into exactly three
    /// colon-separated components
    pub fn parse(raw: &'a str) -> Result<Self, PermissionParseError> {
        let mut components = raw.split(':');

        match (
            components.next(),
            components.next(),
            components.next(),
            components.next(),
        ) {
            (Some(application), Some(resource_type), Some(action), None) => Ok(Self {
                application,
                resource_type,
                action,
            }),
            _ => Err(PermissionParseError::ComponentCount {
                raw: raw.to_string(),
                found: raw.split(':').count(),
            }),
        }
    }

    /// Application component
    pub fn application(&self) -> &'a str {
        self.application
    }

    /// Resource type component
    pub fn resource_type(&self) -> &'a str {
        self.resource_type
    }

    /// Action component
    pub fn action(&self) -> &'a str {
        self.action
    }

    /// Whether this permission carries a wildcard
    pub fn has_wildcards(&self) -> bool {
        self.resource_type == WILDCARD || self.action == WILDCARD
    }

    /// Whether this permission, held as a grant, satisfies `required`
    ///
    /// The application must match exactly; the resource type and action
    /// match exactly or through a `*` on the granted side.
    pub fn grants(&self, required: &Permission<'_>) -> bool {
        self.application == required.application
            && component_matches(self.resource_type, required.resource_type)
            && component_matches(self.action, required.action)
    }
}

fn component_matches(granted: &str, required: &str) -> bool {
    granted == WILDCARD || granted == required
}

impl fmt::Display for Permission<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.application, self.resource_type, self.action)
    }
}
