//! # Tenet Resource
//!
//! Scope hierarchy index for the Tenet identity service: domains and their
//! nested project trees.
//!
//! A domain is a top-level tenant container owning exactly one tree of
//! projects. The parent/child relation is set at project creation and never
//! mutated afterwards, so the hierarchy is acyclic by construction and
//! ancestor/descendant walks always terminate.
//!
//! ## Example
//!
//! ```rust
//! use tenet_resource::{Domain, Project, ResourceIndex};
//!
//! let index = ResourceIndex::new();
//! index.create_domain(Domain::new("d1")).unwrap();
//! index.create_project(Project::root("root", "d1")).unwrap();
//! index.create_project(Project::new("child", "d1", "root")).unwrap();
//!
//! assert_eq!(index.ancestors("child"), vec!["root".to_string()]);
//! assert!(index.is_project_enabled("child"));
//! ```

pub mod error;
pub mod hierarchy;
pub mod types;

pub use error::{ResourceError, Result};
pub use hierarchy::ResourceIndex;
pub use types::{Domain, DomainId, Project, ProjectId};
