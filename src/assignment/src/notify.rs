//! Change notification
//!
//! Every grant mutation, domain disable, and actor delete emits a
//! [`ChangeEvent`] so a revocation/cache-invalidation collaborator can
//! invalidate affected tokens. Delivery is best effort: a notifier failure
//! is logged and never fails the mutation that triggered it.

use crate::error::Result;
use crate::types::{Actor, RoleId, ScopeRef};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tenet_resource::DomainId;

/// A state change that may invalidate issued tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChangeEvent {
    /// A grant was created or re-asserted
    GrantCreated {
        actor: Actor,
        scope: ScopeRef,
        role_id: RoleId,
        inherited: bool,
        at: DateTime<Utc>,
    },

    /// A grant was deleted
    GrantDeleted {
        actor: Actor,
        scope: ScopeRef,
        role_id: RoleId,
        at: DateTime<Utc>,
    },

    /// A domain was disabled
    DomainDisabled { domain_id: DomainId, at: DateTime<Utc> },

    /// A user or group was deleted
    ActorDeleted { actor: Actor, at: DateTime<Utc> },
}

/// Revocation/cache-invalidation collaborator
#[async_trait]
pub trait ChangeNotifier: Send + Sync {
    /// Deliver one change event
    async fn notify(&self, event: &ChangeEvent) -> Result<()>;
}

/// Notifier that drops every event, for deployments without a revocation
/// collaborator
pub struct NullNotifier;

#[async_trait]
impl ChangeNotifier for NullNotifier {
    async fn notify(&self, _event: &ChangeEvent) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serde_tagged() {
        let event = ChangeEvent::DomainDisabled {
            domain_id: "d1".to_string(),
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "domain_disabled");
        assert_eq!(json["domain_id"], "d1");
    }
}
