//! Global role registry
//!
//! Roles are named permission tokens, global rather than scoped. The
//! registry is the existence oracle `create_grant` validates against;
//! deleting a role cascades its grants at the engine layer.

use crate::error::{AssignmentError, Result};
use crate::types::RoleId;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Named permission token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role identifier
    pub id: RoleId,

    /// Human-readable name
    pub name: String,
}

impl Role {
    /// Create a new role
    pub fn new(id: impl Into<RoleId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// In-memory role registry
#[derive(Default)]
pub struct RoleRegistry {
    roles: RwLock<HashMap<RoleId, Role>>,
}

impl RoleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new role
    pub fn create_role(&self, role: Role) -> Result<()> {
        if role.id.is_empty() {
            return Err(AssignmentError::Validation("empty role id".to_string()));
        }
        let mut roles = self.roles.write();
        if roles.contains_key(&role.id) {
            return Err(AssignmentError::Conflict(format!(
                "role {} already exists",
                role.id
            )));
        }
        debug!(role_id = %role.id, "role created");
        roles.insert(role.id.clone(), role);
        Ok(())
    }

    /// Look up a role by id
    pub fn get_role(&self, id: &str) -> Option<Role> {
        self.roles.read().get(id).cloned()
    }

    /// Whether a role with this id exists
    pub fn has_role(&self, id: &str) -> bool {
        self.roles.read().contains_key(id)
    }

    /// Rename an existing role
    pub fn update_role(&self, id: &str, name: impl Into<String>) -> Result<()> {
        let mut roles = self.roles.write();
        let role = roles
            .get_mut(id)
            .ok_or_else(|| AssignmentError::NotFound(format!("role {}", id)))?;
        role.name = name.into();
        Ok(())
    }

    /// Remove a role from the registry
    pub fn delete_role(&self, id: &str) -> Result<Role> {
        let mut roles = self.roles.write();
        let role = roles
            .remove(id)
            .ok_or_else(|| AssignmentError::NotFound(format!("role {}", id)))?;
        debug!(role_id = %id, "role deleted");
        Ok(role)
    }

    /// All registered roles
    pub fn list_roles(&self) -> Vec<Role> {
        self.roles.read().values().cloned().collect()
    }
}
