//! # Tenet Identity
//!
//! Users, groups, and the flat group-membership index for the Tenet
//! identity service. Membership is a plain many-to-many edge between users
//! and groups; groups do not nest.
//!
//! `members_of` on a group that no longer exists returns the empty set
//! instead of an error, which is what lets assignment listings built on top
//! of this index degrade gracefully when a non-cascading store leaves
//! dangling group references behind.

pub mod error;
pub mod membership;
pub mod types;

pub use error::{IdentityError, Result};
pub use membership::IdentityIndex;
pub use types::{Group, GroupId, User, UserId};
