//! Query/filter layer
//!
//! Parses external filter parameters into the engine's internal filter
//! representation and provides the match predicates applied before and
//! after expansion.

use crate::error::{AssignmentError, Result};
use crate::types::{Actor, Assignment, ScopeRef};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Filter key for a user actor
pub const USER_ID_KEY: &str = "user.id";
/// Filter key for a group actor
pub const GROUP_ID_KEY: &str = "group.id";
/// Filter key for a role
pub const ROLE_ID_KEY: &str = "role.id";
/// Filter key for a project scope
pub const PROJECT_SCOPE_KEY: &str = "scope.project.id";
/// Filter key for a domain scope
pub const DOMAIN_SCOPE_KEY: &str = "scope.domain.id";
/// Marker key selecting only inherited grants
pub const INHERITED_TO_KEY: &str = "scope.inherited_to";
/// Value required for the inherited marker
pub const INHERITED_TO_PROJECTS: &str = "projects";
/// Key switching a listing to effective mode
pub const EFFECTIVE_KEY: &str = "effective";

/// Listing mode for `resolve`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListMode {
    /// Stored grants, verbatim, no expansion
    Raw,
    /// Fully expanded effective assignments
    Effective,
}

/// Internal assignment filter
///
/// All fields are optional and conjunctive. In effective mode the actor,
/// role, and inherited constraints are applied to stored rows before
/// expansion; the scope constraints are applied to the expanded rows, since
/// expansion can move an assignment onto scopes other than its stored one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentFilter {
    /// Restrict to grants made to this user
    pub user_id: Option<String>,

    /// Restrict to grants made to this group
    pub group_id: Option<String>,

    /// Restrict to this role
    pub role_id: Option<String>,

    /// Restrict to this project scope
    pub project_id: Option<String>,

    /// Restrict to this domain scope
    pub domain_id: Option<String>,

    /// Restrict to stored rows with the inherited flag set
    pub inherited_only: bool,
}

impl AssignmentFilter {
    /// An empty filter matching everything
    pub fn any() -> Self {
        Self::default()
    }

    /// Restrict to a user actor
    pub fn for_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Restrict to a group actor
    pub fn for_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    /// Restrict to a role
    pub fn for_role(mut self, role_id: impl Into<String>) -> Self {
        self.role_id = Some(role_id.into());
        self
    }

    /// Restrict to a scope
    pub fn for_scope(mut self, scope: &ScopeRef) -> Self {
        match scope {
            ScopeRef::Project(id) => self.project_id = Some(id.clone()),
            ScopeRef::Domain(id) => self.domain_id = Some(id.clone()),
        }
        self
    }

    /// Restrict to a specific actor
    pub fn for_actor(self, actor: &Actor) -> Self {
        match actor {
            Actor::User(id) => self.for_user(id.clone()),
            Actor::Group(id) => self.for_group(id.clone()),
        }
    }

    /// Restrict to inherited rows only
    pub fn inherited_only(mut self) -> Self {
        self.inherited_only = true;
        self
    }

    /// Whether a stored actor satisfies the actor constraints
    pub fn matches_actor(&self, actor: &Actor) -> bool {
        let user_ok = match (&self.user_id, actor) {
            (Some(want), Actor::User(id)) => want == id,
            (Some(_), Actor::Group(_)) => false,
            (None, _) => true,
        };
        let group_ok = match (&self.group_id, actor) {
            (Some(want), Actor::Group(id)) => want == id,
            (Some(_), Actor::User(_)) => false,
            (None, _) => true,
        };
        user_ok && group_ok
    }

    /// Whether a scope satisfies the scope constraints
    pub fn matches_scope(&self, scope: &ScopeRef) -> bool {
        let project_ok = match (&self.project_id, scope) {
            (Some(want), ScopeRef::Project(id)) => want == id,
            (Some(_), ScopeRef::Domain(_)) => false,
            (None, _) => true,
        };
        let domain_ok = match (&self.domain_id, scope) {
            (Some(want), ScopeRef::Domain(id)) => want == id,
            (Some(_), ScopeRef::Project(_)) => false,
            (None, _) => true,
        };
        project_ok && domain_ok
    }

    /// Whether a stored row satisfies every constraint (raw mode)
    pub fn matches_stored(&self, assignment: &Assignment) -> bool {
        self.matches_actor(&assignment.actor)
            && self.matches_scope(&assignment.scope)
            && self.role_id.as_deref().map_or(true, |r| r == assignment.role_id)
            && (!self.inherited_only || assignment.inherited)
    }

    /// Whether a stored row satisfies the pre-expansion constraints
    /// (actor, role, inherited; scope deliberately excluded)
    pub fn matches_pre_expansion(&self, assignment: &Assignment) -> bool {
        self.matches_actor(&assignment.actor)
            && self.role_id.as_deref().map_or(true, |r| r == assignment.role_id)
            && (!self.inherited_only || assignment.inherited)
    }
}

/// Parse external filter parameters into a filter and listing mode
///
/// Recognized keys: `user.id`, `group.id`, `role.id`, `scope.project.id`,
/// `scope.domain.id`, `scope.inherited_to=projects`, and `effective`.
/// Unknown keys are rejected.
pub fn parse_query(params: &HashMap<String, String>) -> Result<(AssignmentFilter, ListMode)> {
    let mut filter = AssignmentFilter::default();
    let mut mode = ListMode::Raw;

    for (key, value) in params {
        match key.as_str() {
            USER_ID_KEY => filter.user_id = Some(value.clone()),
            GROUP_ID_KEY => filter.group_id = Some(value.clone()),
            ROLE_ID_KEY => filter.role_id = Some(value.clone()),
            PROJECT_SCOPE_KEY => filter.project_id = Some(value.clone()),
            DOMAIN_SCOPE_KEY => filter.domain_id = Some(value.clone()),
            INHERITED_TO_KEY => {
                if value != INHERITED_TO_PROJECTS {
                    return Err(AssignmentError::Validation(format!(
                        "{} must be \"{}\", got \"{}\"",
                        INHERITED_TO_KEY, INHERITED_TO_PROJECTS, value
                    )));
                }
                filter.inherited_only = true;
            }
            EFFECTIVE_KEY => {
                if effective_flag(value) {
                    mode = ListMode::Effective;
                }
            }
            other => {
                return Err(AssignmentError::Validation(format!(
                    "unknown filter key \"{}\"",
                    other
                )));
            }
        }
    }

    Ok((filter, mode))
}

/// The boolean contract for the `effective` parameter
///
/// A bare key (empty value) is true, and so is every other value except the
/// literal string `"0"` — including `"True"` and `"False"`. Only `"0"`
/// selects raw mode.
pub fn effective_flag(value: &str) -> bool {
    value != "0"
}
