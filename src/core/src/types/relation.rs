//! Relation verbs checkable against a resource

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Action verb checkable against a single resource.
///
/// The set is closed: adding a relation means adding a variant here and
/// extending every exhaustive match that consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    View,
    Edit,
    Delete,
    Create,
    Move,
    Rename,
}

impl RelationKind {
    /// Every known relation, in canonical order
    pub const ALL: [RelationKind; 6] = [
        RelationKind::View,
        RelationKind::Edit,
        RelationKind::Delete,
        RelationKind::Create,
        RelationKind::Move,
        RelationKind::Rename,
    ];

    /// Wire name of the relation
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::View => "view",
            RelationKind::Edit => "edit",
            RelationKind::Delete => "delete",
            RelationKind::Create => "create",
            RelationKind::Move => "move",
            RelationKind::Rename => "rename",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown relation name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown relation: {0}")]
pub struct ParseRelationError(pub String);

impl FromStr for RelationKind {
    type Err = ParseRelationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelationKind::ALL
            .into_iter()
            .find(|relation| relation.as_str() == s)
            .ok_or_else(|| ParseRelationError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_names_roundtrip() {
        for relation in RelationKind::ALL {
            assert_eq!(relation.as_str().parse::<RelationKind>(), Ok(relation));
        }
    }

    #[test]
    fn test_unknown_relation() {
        let err = "share".parse::<RelationKind>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown relation: share");
        // Names are case-sensitive
        assert!("View".parse::<RelationKind>().is_err());
    }

    #[test]
    fn test_relation_serde_name() {
        let json = serde_json::to_string(&RelationKind::Move).unwrap();
        assert_eq!(json, "\"move\"");
    }
}
