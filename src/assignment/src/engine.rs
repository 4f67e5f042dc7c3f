//! Hierarchical role-assignment resolution engine
//!
//! Turns the small set of stored grants into the full set of effective
//! permissions by composing two independent expansion axes: group
//! membership (a group grant applies to every current member) and scope
//! inheritance (an inherited grant applies to every descendant project).
//!
//! The engine holds no derived-result cache. Every `resolve` call reads the
//! assignment store, hierarchy index, and membership index fresh, so a
//! mutation is visible to the very next query.

use crate::config::EngineConfig;
use crate::error::{AssignmentError, Result};
use crate::filter::{AssignmentFilter, ListMode};
use crate::notify::{ChangeEvent, ChangeNotifier};
use crate::roles::RoleRegistry;
use crate::store::AssignmentStore;
use crate::types::{
    Actor, Assignment, EffectiveAssignment, ResolvedAssignment, RoleId, ScopeRef, UserId,
};
use chrono::Utc;
use std::collections::BTreeSet;
use std::sync::Arc;
use tenet_identity::IdentityIndex;
use tenet_resource::ResourceIndex;
use tracing::{debug, info, warn};

/// Resolution engine over stored grants, the scope hierarchy, and the
/// membership index
pub struct AssignmentEngine {
    config: EngineConfig,
    resource: Arc<ResourceIndex>,
    identity: Arc<IdentityIndex>,
    roles: Arc<RoleRegistry>,
    store: Arc<dyn AssignmentStore>,
    notifier: Option<Arc<dyn ChangeNotifier>>,
}

impl AssignmentEngine {
    /// Create an engine over the given collaborators
    pub fn new(
        config: EngineConfig,
        resource: Arc<ResourceIndex>,
        identity: Arc<IdentityIndex>,
        roles: Arc<RoleRegistry>,
        store: Arc<dyn AssignmentStore>,
    ) -> Self {
        info!(
            inheritance_enabled = config.inheritance_enabled,
            "assignment engine initialized"
        );
        Self {
            config,
            resource,
            identity,
            roles,
            store,
            notifier: None,
        }
    }

    /// Attach a revocation/cache-invalidation collaborator
    pub fn with_notifier(mut self, notifier: Arc<dyn ChangeNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// The hierarchy index this engine reads
    pub fn resource(&self) -> &Arc<ResourceIndex> {
        &self.resource
    }

    /// The membership index this engine reads
    pub fn identity(&self) -> &Arc<IdentityIndex> {
        &self.identity
    }

    /// The role registry this engine validates against
    pub fn roles(&self) -> &Arc<RoleRegistry> {
        &self.roles
    }

    /// The engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------

    /// Resolve assignments matching `filter`
    ///
    /// Raw mode returns stored grants verbatim with every filter constraint
    /// applied directly. Effective mode applies the actor, role, and
    /// inherited constraints to stored rows, expands each surviving row
    /// along the membership and inheritance axes, and applies the scope
    /// constraints to the expanded rows.
    ///
    /// Result order is unspecified; rows that coincide on
    /// `(user, scope, role)` but come from distinct stored grants are all
    /// kept, each with its own origin link.
    pub async fn resolve(
        &self,
        filter: &AssignmentFilter,
        mode: ListMode,
    ) -> Result<Vec<ResolvedAssignment>> {
        match mode {
            ListMode::Raw => {
                let stored = self.store.list(filter).await?;
                Ok(stored.into_iter().map(ResolvedAssignment::Stored).collect())
            }
            ListMode::Effective => {
                // Scope constraints apply after expansion, since expansion
                // can move a grant onto scopes other than its stored one.
                let mut pre = filter.clone();
                pre.project_id = None;
                pre.domain_id = None;

                let stored = self.store.list(&pre).await?;
                let mut out = Vec::new();
                for assignment in stored {
                    self.expand(&assignment, filter, &mut out);
                }
                Ok(out)
            }
        }
    }

    /// Expand one stored grant into effective rows, pushing every row that
    /// survives the post-expansion scope filter
    fn expand(
        &self,
        assignment: &Assignment,
        filter: &AssignmentFilter,
        out: &mut Vec<ResolvedAssignment>,
    ) {
        if assignment.inherited && !self.config.inheritance_enabled {
            return;
        }

        // Actor axis: a group grant applies to each current member. A
        // dangling group reference yields an empty member set, degrading to
        // zero rows rather than an error.
        let users: Vec<UserId> = match &assignment.actor {
            Actor::User(id) => vec![id.clone()],
            Actor::Group(id) => self.identity.members_of(id).into_iter().collect(),
        };

        // Scope axis: an inherited grant covers its own scope plus every
        // descendant project.
        let mut scopes: Vec<ScopeRef> = vec![assignment.scope.clone()];
        if assignment.inherited {
            match &assignment.scope {
                ScopeRef::Domain(id) => scopes.extend(
                    self.resource
                        .projects_in_domain(id)
                        .into_iter()
                        .map(ScopeRef::Project),
                ),
                ScopeRef::Project(id) => scopes.extend(
                    self.resource
                        .descendants(id)
                        .into_iter()
                        .map(ScopeRef::Project),
                ),
            }
        }

        for user_id in &users {
            for scope in &scopes {
                if !filter.matches_scope(scope) {
                    continue;
                }
                out.push(ResolvedAssignment::Effective(EffectiveAssignment {
                    user_id: user_id.clone(),
                    scope: scope.clone(),
                    role_id: assignment.role_id.clone(),
                    origin: assignment.clone(),
                }));
            }
        }
    }

    /// Admission check used by token issuance
    ///
    /// True when the user holds `role_id` (or any role, if `None`) on the
    /// scope, directly or through group membership or inheritance — gated
    /// by the scope's enabled chain: a disabled domain or project (or
    /// ancestor) fails the check regardless of grants.
    pub async fn has_effective_role(
        &self,
        user_id: &str,
        scope: &ScopeRef,
        role_id: Option<&str>,
    ) -> Result<bool> {
        if !self.scope_enabled(scope) {
            debug!(user_id, scope = %scope.id(), "admission denied: scope disabled");
            return Ok(false);
        }

        let mut actors = vec![Actor::User(user_id.to_string())];
        actors.extend(self.identity.groups_of(user_id).into_iter().map(Actor::Group));

        for actor in actors {
            let mut filter = AssignmentFilter::any().for_actor(&actor).for_scope(scope);
            if let Some(role_id) = role_id {
                filter = filter.for_role(role_id);
            }
            if !self.resolve(&filter, ListMode::Effective).await?.is_empty() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Distinct roles a user effectively holds on a scope, directly or via
    /// group membership, sorted for stable output
    pub async fn roles_for_user_on_scope(
        &self,
        user_id: &str,
        scope: &ScopeRef,
    ) -> Result<Vec<RoleId>> {
        let mut actors = vec![Actor::User(user_id.to_string())];
        actors.extend(self.identity.groups_of(user_id).into_iter().map(Actor::Group));

        let mut roles = BTreeSet::new();
        for actor in actors {
            let filter = AssignmentFilter::any().for_actor(&actor).for_scope(scope);
            for row in self.resolve(&filter, ListMode::Effective).await? {
                roles.insert(row.role_id().to_string());
            }
        }
        Ok(roles.into_iter().collect())
    }

    // ------------------------------------------------------------------
    // Grant mutation
    // ------------------------------------------------------------------

    /// Create a grant
    ///
    /// Validates that the actor, scope, and role all exist. Idempotent:
    /// re-asserting an identical grant is a no-op, except that
    /// `inherited=true` upgrades an existing non-inherited row.
    pub async fn create_grant(
        &self,
        actor: Actor,
        scope: ScopeRef,
        role_id: impl Into<RoleId>,
        inherited: bool,
    ) -> Result<()> {
        let role_id = role_id.into();
        if !self.roles.has_role(&role_id) {
            return Err(AssignmentError::NotFound(format!("role {}", role_id)));
        }
        match &actor {
            Actor::User(id) if !self.identity.has_user(id) => {
                return Err(AssignmentError::NotFound(format!("user {}", id)));
            }
            Actor::Group(id) if !self.identity.has_group(id) => {
                return Err(AssignmentError::NotFound(format!("group {}", id)));
            }
            _ => {}
        }
        match &scope {
            ScopeRef::Domain(id) if !self.resource.has_domain(id) => {
                return Err(AssignmentError::NotFound(format!("domain {}", id)));
            }
            ScopeRef::Project(id) if !self.resource.has_project(id) => {
                return Err(AssignmentError::NotFound(format!("project {}", id)));
            }
            _ => {}
        }

        let assignment = Assignment::new(actor.clone(), scope.clone(), role_id.clone())
            .inherited(inherited);
        self.store.insert(assignment).await?;
        debug!(actor = %actor.id(), scope = %scope.id(), role_id = %role_id, inherited, "grant created");

        self.emit(ChangeEvent::GrantCreated {
            actor,
            scope,
            role_id,
            inherited,
            at: Utc::now(),
        })
        .await;
        Ok(())
    }

    /// Delete a grant; `NotFound` if absent
    pub async fn delete_grant(
        &self,
        actor: &Actor,
        scope: &ScopeRef,
        role_id: &str,
    ) -> Result<()> {
        self.store.delete(actor, scope, role_id).await?;
        debug!(actor = %actor.id(), scope = %scope.id(), role_id, "grant deleted");

        self.emit(ChangeEvent::GrantDeleted {
            actor: actor.clone(),
            scope: scope.clone(),
            role_id: role_id.to_string(),
            at: Utc::now(),
        })
        .await;
        Ok(())
    }

    /// Roles directly granted to one actor on one scope
    pub async fn list_grants(&self, actor: &Actor, scope: &ScopeRef) -> Result<Vec<RoleId>> {
        let filter = AssignmentFilter::any().for_actor(actor).for_scope(scope);
        let mut roles: Vec<RoleId> = self
            .store
            .list(&filter)
            .await?
            .into_iter()
            .map(|a| a.role_id)
            .collect();
        roles.sort();
        Ok(roles)
    }

    // ------------------------------------------------------------------
    // Lifecycle drivers
    // ------------------------------------------------------------------

    /// Delete a user and purge its grants
    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        self.identity.delete_user(user_id)?;
        let actor = Actor::User(user_id.to_string());
        self.store.delete_by_actor(&actor).await?;
        self.emit(ChangeEvent::ActorDeleted {
            actor,
            at: Utc::now(),
        })
        .await;
        Ok(())
    }

    /// Delete a group and purge its grants
    pub async fn delete_group(&self, group_id: &str) -> Result<()> {
        self.identity.delete_group(group_id)?;
        let actor = Actor::Group(group_id.to_string());
        self.store.delete_by_actor(&actor).await?;
        self.emit(ChangeEvent::ActorDeleted {
            actor,
            at: Utc::now(),
        })
        .await;
        Ok(())
    }

    /// Delete a leaf project and purge its grants
    pub async fn delete_project(&self, project_id: &str) -> Result<()> {
        self.resource.delete_project(project_id)?;
        self.store
            .delete_by_scope(&ScopeRef::Project(project_id.to_string()))
            .await?;
        Ok(())
    }

    /// Delete a role and purge its grants
    pub async fn delete_role(&self, role_id: &str) -> Result<()> {
        self.roles.delete_role(role_id)?;
        self.store.delete_by_role(role_id).await?;
        Ok(())
    }

    /// Disable a domain and notify the revocation collaborator
    pub async fn disable_domain(&self, domain_id: &str) -> Result<()> {
        self.resource.set_domain_enabled(domain_id, false)?;
        self.emit(ChangeEvent::DomainDisabled {
            domain_id: domain_id.to_string(),
            at: Utc::now(),
        })
        .await;
        Ok(())
    }

    /// Delete a disabled domain, cascading its project tree, users,
    /// groups, and all of their grants
    pub async fn delete_domain(&self, domain_id: &str) -> Result<()> {
        let users = self.identity.users_in_domain(domain_id);
        let groups = self.identity.groups_in_domain(domain_id);

        // Fails unless the domain exists and is disabled; removes the tree.
        let projects = self.resource.delete_domain(domain_id)?;

        self.store
            .delete_by_scope(&ScopeRef::Domain(domain_id.to_string()))
            .await?;
        for project_id in projects {
            self.store
                .delete_by_scope(&ScopeRef::Project(project_id))
                .await?;
        }
        for user_id in users {
            // The user may already be gone; grants are purged regardless.
            let _ = self.identity.delete_user(&user_id);
            let actor = Actor::User(user_id);
            self.store.delete_by_actor(&actor).await?;
            self.emit(ChangeEvent::ActorDeleted {
                actor,
                at: Utc::now(),
            })
            .await;
        }
        for group_id in groups {
            let _ = self.identity.delete_group(&group_id);
            let actor = Actor::Group(group_id);
            self.store.delete_by_actor(&actor).await?;
            self.emit(ChangeEvent::ActorDeleted {
                actor,
                at: Utc::now(),
            })
            .await;
        }
        info!(domain_id, "domain deleted with cascade");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn scope_enabled(&self, scope: &ScopeRef) -> bool {
        match scope {
            ScopeRef::Domain(id) => self.resource.is_domain_enabled(id),
            ScopeRef::Project(id) => self.resource.is_project_enabled(id),
        }
    }

    async fn emit(&self, event: ChangeEvent) {
        if let Some(notifier) = &self.notifier {
            if let Err(e) = notifier.notify(&event).await {
                warn!(error = %e, "change notification failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::Role;
    use crate::store::MemoryAssignmentStore;
    use tenet_identity::User;
    use tenet_resource::{Domain, Project};

    fn engine() -> AssignmentEngine {
        let resource = Arc::new(ResourceIndex::new());
        let identity = Arc::new(IdentityIndex::new());
        let roles = Arc::new(RoleRegistry::new());

        resource.create_domain(Domain::new("d1")).unwrap();
        resource.create_project(Project::root("p1", "d1")).unwrap();
        identity.create_user(User::new("u1", "d1")).unwrap();
        roles.create_role(Role::new("reader", "Reader")).unwrap();

        AssignmentEngine::new(
            EngineConfig::default(),
            resource,
            identity,
            roles,
            Arc::new(MemoryAssignmentStore::new()),
        )
    }

    #[tokio::test]
    async fn test_create_grant_validates_references() {
        let engine = engine();
        let user = Actor::User("u1".to_string());
        let project = ScopeRef::Project("p1".to_string());

        engine
            .create_grant(user.clone(), project.clone(), "reader", false)
            .await
            .unwrap();

        let err = engine
            .create_grant(user.clone(), project.clone(), "ghost-role", false)
            .await
            .unwrap_err();
        assert!(matches!(err, AssignmentError::NotFound(_)));

        let err = engine
            .create_grant(
                Actor::User("ghost".to_string()),
                project.clone(),
                "reader",
                false,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AssignmentError::NotFound(_)));

        let err = engine
            .create_grant(user, ScopeRef::Project("ghost".to_string()), "reader", false)
            .await
            .unwrap_err();
        assert!(matches!(err, AssignmentError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_grants_sorted() {
        let engine = engine();
        engine.roles().create_role(Role::new("admin", "Admin")).unwrap();
        let user = Actor::User("u1".to_string());
        let project = ScopeRef::Project("p1".to_string());

        engine
            .create_grant(user.clone(), project.clone(), "reader", false)
            .await
            .unwrap();
        engine
            .create_grant(user.clone(), project.clone(), "admin", false)
            .await
            .unwrap();

        assert_eq!(
            engine.list_grants(&user, &project).await.unwrap(),
            vec!["admin".to_string(), "reader".to_string()]
        );
    }

    #[tokio::test]
    async fn test_delete_role_cascades_grants() {
        let engine = engine();
        let user = Actor::User("u1".to_string());
        let project = ScopeRef::Project("p1".to_string());
        engine
            .create_grant(user.clone(), project.clone(), "reader", false)
            .await
            .unwrap();

        engine.delete_role("reader").await.unwrap();

        let rows = engine
            .resolve(&AssignmentFilter::any(), ListMode::Raw)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_delete_domain_requires_disable() {
        let engine = engine();
        let err = engine.delete_domain("d1").await.unwrap_err();
        assert!(matches!(err, AssignmentError::Resource(_)));

        engine.disable_domain("d1").await.unwrap();
        engine.delete_domain("d1").await.unwrap();
        assert!(!engine.resource().has_domain("d1"));
        assert!(!engine.identity().has_user("u1"));
    }
}
