//! Core assignment types

use serde::{Deserialize, Serialize};

pub use tenet_identity::{GroupId, UserId};
pub use tenet_resource::{DomainId, ProjectId};

/// Unique role identifier
pub type RoleId = String;

/// The actor a grant is made to: exactly one of a user or a group
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Actor {
    /// A single user
    User(UserId),
    /// A group of users
    Group(GroupId),
}

impl Actor {
    /// The raw id, regardless of actor kind
    pub fn id(&self) -> &str {
        match self {
            Actor::User(id) | Actor::Group(id) => id,
        }
    }

    /// Whether this actor is a user
    pub fn is_user(&self) -> bool {
        matches!(self, Actor::User(_))
    }
}

/// The target of a grant: exactly one of a domain or a project
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum ScopeRef {
    /// A whole domain
    Domain(DomainId),
    /// A single project
    Project(ProjectId),
}

impl ScopeRef {
    /// The raw id, regardless of scope kind
    pub fn id(&self) -> &str {
        match self {
            ScopeRef::Domain(id) | ScopeRef::Project(id) => id,
        }
    }
}

/// A stored grant: the atomic authorization fact
///
/// `inherited` means the grant also applies to every project strictly
/// descended from `scope`. It still authorizes `scope` itself, identically
/// to a non-inherited grant on the same scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    /// Who holds the role
    pub actor: Actor,

    /// Where the role applies
    pub scope: ScopeRef,

    /// Which role is held
    pub role_id: RoleId,

    /// Whether the grant extends to descendant projects
    #[serde(default)]
    pub inherited: bool,
}

impl Assignment {
    /// Create a direct (non-inherited) grant
    pub fn new(actor: Actor, scope: ScopeRef, role_id: impl Into<RoleId>) -> Self {
        Self {
            actor,
            scope,
            role_id: role_id.into(),
            inherited: false,
        }
    }

    /// Set the inherited flag
    pub fn inherited(mut self, inherited: bool) -> Self {
        self.inherited = inherited;
        self
    }
}

/// A derived authorization fact, never persisted
///
/// Produced by expanding one stored [`Assignment`] along the
/// group-membership axis and/or the inheritance axis. `origin` identifies
/// the stored grant the row came from; it is what listing APIs hyperlink
/// and what delete-by-origin acts on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveAssignment {
    /// The concrete user holding the role
    pub user_id: UserId,

    /// The concrete scope the role applies to
    pub scope: ScopeRef,

    /// Which role is held
    pub role_id: RoleId,

    /// The stored grant this row was expanded from
    pub origin: Assignment,
}

/// One row of a `resolve` result: stored in raw mode, expanded in
/// effective mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolvedAssignment {
    /// A stored grant, returned verbatim
    Stored(Assignment),
    /// An expanded effective assignment
    Effective(EffectiveAssignment),
}

impl ResolvedAssignment {
    /// The role id carried by this row
    pub fn role_id(&self) -> &str {
        match self {
            ResolvedAssignment::Stored(a) => &a.role_id,
            ResolvedAssignment::Effective(e) => &e.role_id,
        }
    }

    /// The scope this row applies to
    pub fn scope(&self) -> &ScopeRef {
        match self {
            ResolvedAssignment::Stored(a) => &a.scope,
            ResolvedAssignment::Effective(e) => &e.scope,
        }
    }
}
