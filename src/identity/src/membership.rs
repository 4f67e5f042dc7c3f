//! Group membership index
//!
//! Flat user↔group edges with lookups in both directions. Mutations go
//! through a single write lock; queries never fail on unknown ids.

use crate::error::{IdentityError, Result};
use crate::types::{Group, GroupId, User, UserId};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use tracing::debug;

#[derive(Default)]
struct IndexInner {
    users: HashMap<UserId, User>,
    groups: HashMap<GroupId, Group>,
    user_groups: HashMap<UserId, HashSet<GroupId>>,
    group_users: HashMap<GroupId, HashSet<UserId>>,
}

/// In-memory user/group/membership index
#[derive(Default)]
pub struct IdentityIndex {
    inner: RwLock<IndexInner>,
}

impl IdentityIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Register a new user
    pub fn create_user(&self, user: User) -> Result<()> {
        if user.id.is_empty() {
            return Err(IdentityError::Validation("empty user id".to_string()));
        }
        let mut inner = self.inner.write();
        if inner.users.contains_key(&user.id) {
            return Err(IdentityError::Conflict(format!(
                "user {} already exists",
                user.id
            )));
        }
        debug!(user_id = %user.id, domain_id = %user.domain_id, "user created");
        inner.users.insert(user.id.clone(), user);
        Ok(())
    }

    /// Look up a user by id
    pub fn get_user(&self, id: &str) -> Option<User> {
        self.inner.read().users.get(id).cloned()
    }

    /// Whether a user with this id exists
    pub fn has_user(&self, id: &str) -> bool {
        self.inner.read().users.contains_key(id)
    }

    /// Delete a user, dropping its membership edges
    pub fn delete_user(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.users.remove(id).is_none() {
            return Err(IdentityError::NotFound(format!("user {}", id)));
        }
        if let Some(groups) = inner.user_groups.remove(id) {
            for gid in groups {
                if let Some(members) = inner.group_users.get_mut(&gid) {
                    members.remove(id);
                }
            }
        }
        debug!(user_id = %id, "user deleted");
        Ok(())
    }

    /// Ids of all users belonging to a domain
    pub fn users_in_domain(&self, domain_id: &str) -> Vec<UserId> {
        self.inner
            .read()
            .users
            .values()
            .filter(|u| u.domain_id == domain_id)
            .map(|u| u.id.clone())
            .collect()
    }

    // ------------------------------------------------------------------
    // Groups
    // ------------------------------------------------------------------

    /// Register a new group
    pub fn create_group(&self, group: Group) -> Result<()> {
        if group.id.is_empty() {
            return Err(IdentityError::Validation("empty group id".to_string()));
        }
        let mut inner = self.inner.write();
        if inner.groups.contains_key(&group.id) {
            return Err(IdentityError::Conflict(format!(
                "group {} already exists",
                group.id
            )));
        }
        debug!(group_id = %group.id, domain_id = %group.domain_id, "group created");
        inner.groups.insert(group.id.clone(), group);
        Ok(())
    }

    /// Look up a group by id
    pub fn get_group(&self, id: &str) -> Option<Group> {
        self.inner.read().groups.get(id).cloned()
    }

    /// Whether a group with this id exists
    pub fn has_group(&self, id: &str) -> bool {
        self.inner.read().groups.contains_key(id)
    }

    /// Delete a group, dropping its membership edges
    pub fn delete_group(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.groups.remove(id).is_none() {
            return Err(IdentityError::NotFound(format!("group {}", id)));
        }
        if let Some(members) = inner.group_users.remove(id) {
            for uid in members {
                if let Some(groups) = inner.user_groups.get_mut(&uid) {
                    groups.remove(id);
                }
            }
        }
        debug!(group_id = %id, "group deleted");
        Ok(())
    }

    /// Ids of all groups belonging to a domain
    pub fn groups_in_domain(&self, domain_id: &str) -> Vec<GroupId> {
        self.inner
            .read()
            .groups
            .values()
            .filter(|g| g.domain_id == domain_id)
            .map(|g| g.id.clone())
            .collect()
    }

    // ------------------------------------------------------------------
    // Membership
    // ------------------------------------------------------------------

    /// Add a user to a group; idempotent for an existing edge
    pub fn add_member(&self, user_id: &str, group_id: &str) -> Result<()> {
        let mut inner = self.inner.write();
        if !inner.users.contains_key(user_id) {
            return Err(IdentityError::NotFound(format!("user {}", user_id)));
        }
        if !inner.groups.contains_key(group_id) {
            return Err(IdentityError::NotFound(format!("group {}", group_id)));
        }
        inner
            .user_groups
            .entry(user_id.to_string())
            .or_default()
            .insert(group_id.to_string());
        inner
            .group_users
            .entry(group_id.to_string())
            .or_default()
            .insert(user_id.to_string());
        debug!(user_id, group_id, "membership added");
        Ok(())
    }

    /// Remove a user from a group
    pub fn remove_member(&self, user_id: &str, group_id: &str) -> Result<()> {
        let mut inner = self.inner.write();
        let removed = inner
            .user_groups
            .get_mut(user_id)
            .is_some_and(|g| g.remove(group_id));
        if !removed {
            return Err(IdentityError::NotFound(format!(
                "user {} is not a member of group {}",
                user_id, group_id
            )));
        }
        if let Some(members) = inner.group_users.get_mut(group_id) {
            members.remove(user_id);
        }
        debug!(user_id, group_id, "membership removed");
        Ok(())
    }

    /// Groups a user belongs to; empty for unknown users
    pub fn groups_of(&self, user_id: &str) -> HashSet<GroupId> {
        self.inner
            .read()
            .user_groups
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Members of a group; empty for unknown or deleted groups
    pub fn members_of(&self, group_id: &str) -> HashSet<UserId> {
        self.inner
            .read()
            .group_users
            .get(group_id)
            .cloned()
            .unwrap_or_default()
    }
}
