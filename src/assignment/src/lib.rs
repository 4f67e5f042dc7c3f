//! # Tenet Assignment
//!
//! The authorization core of the Tenet identity service: decides, for any
//! (actor, scope, role) triple, whether a grant exists — directly, through
//! group membership, or through hierarchical inheritance across nested
//! scopes.
//!
//! ## Features
//!
//! - **Raw and effective listings** over stored grants, with filtered,
//!   on-demand queries
//! - **Group expansion**: a group grant applies to every current member
//! - **Scope inheritance**: an inherited grant applies to its scope and
//!   every descendant project
//! - **Origin links** from every effective row back to the stored grant
//!   that produced it
//! - **Pluggable storage** behind the narrow [`AssignmentStore`] trait,
//!   tolerant of backends that do not cascade on delete
//! - **No derived-result cache**: every query reflects the latest
//!   committed state of its inputs
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tenet_assignment::{
//!     Actor, AssignmentEngine, AssignmentFilter, EngineConfig, ListMode,
//!     MemoryAssignmentStore, Role, RoleRegistry, ScopeRef,
//! };
//! use tenet_identity::{IdentityIndex, User};
//! use tenet_resource::{Domain, Project, ResourceIndex};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let resource = Arc::new(ResourceIndex::new());
//! let identity = Arc::new(IdentityIndex::new());
//! let roles = Arc::new(RoleRegistry::new());
//!
//! resource.create_domain(Domain::new("d1"))?;
//! resource.create_project(Project::root("p1", "d1"))?;
//! identity.create_user(User::new("alice", "d1"))?;
//! roles.create_role(Role::new("reader", "Reader"))?;
//!
//! let engine = AssignmentEngine::new(
//!     EngineConfig::default(),
//!     resource,
//!     identity,
//!     roles,
//!     Arc::new(MemoryAssignmentStore::new()),
//! );
//!
//! engine
//!     .create_grant(
//!         Actor::User("alice".into()),
//!         ScopeRef::Project("p1".into()),
//!         "reader",
//!         false,
//!     )
//!     .await?;
//!
//! let scope = ScopeRef::Project("p1".into());
//! assert!(engine.has_effective_role("alice", &scope, Some("reader")).await?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod notify;
pub mod roles;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::EngineConfig;
pub use engine::AssignmentEngine;
pub use error::{AssignmentError, Result};
pub use filter::{parse_query, AssignmentFilter, ListMode};
pub use notify::{ChangeEvent, ChangeNotifier, NullNotifier};
pub use roles::{Role, RoleRegistry};
pub use store::{AssignmentStore, MemoryAssignmentStore};
pub use types::{
    Actor, Assignment, EffectiveAssignment, ResolvedAssignment, RoleId, ScopeRef,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
