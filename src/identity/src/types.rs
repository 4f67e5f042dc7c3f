//! User and group definitions

use serde::{Deserialize, Serialize};

/// Unique user identifier
pub type UserId = String;

/// Unique group identifier
pub type GroupId = String;

/// Identity principal, owned by exactly one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier
    pub id: UserId,

    /// Owning domain
    pub domain_id: String,

    /// Whether the user is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl User {
    /// Create a new enabled user
    pub fn new(id: impl Into<UserId>, domain_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            domain_id: domain_id.into(),
            enabled: true,
        }
    }
}

/// Collection of users, owned by exactly one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Group identifier
    pub id: GroupId,

    /// Owning domain
    pub domain_id: String,
}

impl Group {
    /// Create a new group
    pub fn new(id: impl Into<GroupId>, domain_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            domain_id: domain_id.into(),
        }
    }
}

fn default_enabled() -> bool {
    true
}
