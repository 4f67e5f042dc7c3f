//! Domain and project definitions

use serde::{Deserialize, Serialize};

/// Unique domain identifier
pub type DomainId = String;

/// Unique project identifier
pub type ProjectId = String;

/// Top-level tenant container owning a project tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Domain identifier
    pub id: DomainId,

    /// Whether the domain is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Domain {
    /// Create a new enabled domain
    pub fn new(id: impl Into<DomainId>) -> Self {
        Self {
            id: id.into(),
            enabled: true,
        }
    }

    /// Set the enabled flag
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Nested authorization scope within a domain
///
/// `parent_id` is `None` only for a domain's root project and is immutable
/// after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project identifier
    pub id: ProjectId,

    /// Owning domain
    pub domain_id: DomainId,

    /// Parent project, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ProjectId>,

    /// Whether the project is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Project {
    /// Create a child project under `parent_id`
    pub fn new(
        id: impl Into<ProjectId>,
        domain_id: impl Into<DomainId>,
        parent_id: impl Into<ProjectId>,
    ) -> Self {
        Self {
            id: id.into(),
            domain_id: domain_id.into(),
            parent_id: Some(parent_id.into()),
            enabled: true,
        }
    }

    /// Create a domain's root project
    pub fn root(id: impl Into<ProjectId>, domain_id: impl Into<DomainId>) -> Self {
        Self {
            id: id.into(),
            domain_id: domain_id.into(),
            parent_id: None,
            enabled: true,
        }
    }

    /// Set the enabled flag
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

fn default_enabled() -> bool {
    true
}
