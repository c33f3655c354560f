//! Per-resource permission records and aggregate flags

use rbac_core::{RelationKind, Resource};
use serde::{Deserialize, Serialize};

/// Every relation's verdict for one resource
///
/// There is one field per [`RelationKind`], so a record is complete by
/// construction; unresolved relations are `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionRecord {
    pub view: bool,
    pub edit: bool,
    pub delete: bool,
    pub create: bool,
    pub r#move: bool,
    pub rename: bool,
}

impl PermissionRecord {
    /// Record with every relation denied
    pub fn denied() -> Self {
        Self::default()
    }

    /// Build a record by asking `allowed` for each relation
    pub fn from_fn<F>(mut allowed: F) -> Self
    where
        F: FnMut(RelationKind) -> bool,
    {
        let mut record = Self::default();
        for relation in RelationKind::ALL {
            record.set(relation, allowed(relation));
        }
        record
    }

    /// Verdict for one relation
    pub fn get(&self, relation: RelationKind) -> bool {
        match relation {
            RelationKind::View => self.view,
            RelationKind::Edit => self.edit,
            RelationKind::Delete => self.delete,
            RelationKind::Create => self.create,
            RelationKind::Move => self.r#move,
            RelationKind::Rename => self.rename,
        }
    }

    /// Set the verdict for one relation
    pub fn set(&mut self, relation: RelationKind, allowed: bool) {
        let slot = match relation {
            RelationKind::View => &mut self.view,
            RelationKind::Edit => &mut self.edit,
            RelationKind::Delete => &mut self.delete,
            RelationKind::Create => &mut self.create,
            RelationKind::Move => &mut self.r#move,
            RelationKind::Rename => &mut self.rename,
        };
        *slot = allowed;
    }

    /// Relations that are allowed, in canonical order
    pub fn allowed_relations(&self) -> Vec<RelationKind> {
        RelationKind::ALL
            .into_iter()
            .filter(|relation| self.get(*relation))
            .collect()
    }

    /// Whether at least one relation is allowed
    pub fn any(&self) -> bool {
        RelationKind::ALL.into_iter().any(|relation| self.get(relation))
    }
}

/// A resource paired with its permission record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePermissions {
    pub resource: Resource,
    pub permissions: PermissionRecord,
}

/// Aggregate affordances for a resource collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionFlags {
    /// Relations allowed on at least one resource
    pub any_allowed: PermissionRecord,

    /// Relations allowed on the root resource
    pub root_allowed: PermissionRecord,

    /// Whether the underlying resolution is still in flight
    pub is_loading: bool,
}
