//! Assignment storage
//!
//! The engine depends only on the narrow [`AssignmentStore`] capability
//! trait. Backends differ in cascade-on-delete fidelity: the `delete_by_*`
//! hooks are best effort, and a backend that leaves orphan rows behind is
//! tolerated — the engine's read paths degrade to empty expansions instead
//! of erroring on dangling references.

use crate::error::{AssignmentError, Result};
use crate::filter::AssignmentFilter;
use crate::types::{Actor, Assignment, ScopeRef};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Identity of a stored grant row
type AssignmentKey = (Actor, ScopeRef, String);

fn key_of(assignment: &Assignment) -> AssignmentKey {
    (
        assignment.actor.clone(),
        assignment.scope.clone(),
        assignment.role_id.clone(),
    )
}

/// Durable record of raw grants
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Enumerate stored grants matching the filter's stored-row predicates
    async fn list(&self, filter: &AssignmentFilter) -> Result<Vec<Assignment>>;

    /// Insert a grant; idempotent on an identical `(actor, scope, role)`
    /// key. Re-asserting an existing grant with `inherited=true` upgrades
    /// the stored flag.
    async fn insert(&self, assignment: Assignment) -> Result<()>;

    /// Delete one grant; `NotFound` if absent
    async fn delete(&self, actor: &Actor, scope: &ScopeRef, role_id: &str) -> Result<()>;

    /// Drop every grant made to an actor; returns the number removed
    async fn delete_by_actor(&self, actor: &Actor) -> Result<usize>;

    /// Drop every grant on a scope; returns the number removed
    async fn delete_by_scope(&self, scope: &ScopeRef) -> Result<usize>;

    /// Drop every grant of a role; returns the number removed
    async fn delete_by_role(&self, role_id: &str) -> Result<usize>;
}

/// In-memory assignment store, fully cascading
pub struct MemoryAssignmentStore {
    rows: Arc<RwLock<HashMap<AssignmentKey, Assignment>>>,
}

impl MemoryAssignmentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored grants
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Whether the store holds no grants
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

impl Default for MemoryAssignmentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssignmentStore for MemoryAssignmentStore {
    async fn list(&self, filter: &AssignmentFilter) -> Result<Vec<Assignment>> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .filter(|a| filter.matches_stored(a))
            .cloned()
            .collect())
    }

    async fn insert(&self, assignment: Assignment) -> Result<()> {
        let mut rows = self.rows.write().await;
        let key = key_of(&assignment);
        match rows.get_mut(&key) {
            Some(existing) => {
                // Idempotent re-assert; inherited may only be upgraded
                existing.inherited |= assignment.inherited;
            }
            None => {
                rows.insert(key, assignment);
            }
        }
        Ok(())
    }

    async fn delete(&self, actor: &Actor, scope: &ScopeRef, role_id: &str) -> Result<()> {
        let mut rows = self.rows.write().await;
        let key = (actor.clone(), scope.clone(), role_id.to_string());
        if rows.remove(&key).is_none() {
            return Err(AssignmentError::NotFound(format!(
                "grant of {} to {} on {}",
                role_id,
                actor.id(),
                scope.id()
            )));
        }
        Ok(())
    }

    async fn delete_by_actor(&self, actor: &Actor) -> Result<usize> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|_, a| a.actor != *actor);
        Ok(before - rows.len())
    }

    async fn delete_by_scope(&self, scope: &ScopeRef) -> Result<usize> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|_, a| a.scope != *scope);
        Ok(before - rows.len())
    }

    async fn delete_by_role(&self, role_id: &str) -> Result<usize> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|_, a| a.role_id != role_id);
        Ok(before - rows.len())
    }
}
