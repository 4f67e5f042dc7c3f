//! Engine configuration
//!
//! All configuration is threaded explicitly into the engine constructor;
//! resolution logic never consults ambient process-wide state.

use serde::{Deserialize, Serialize};
use tenet_resource::DomainId;

/// Resolution engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Whether inherited grants expand to descendant projects
    ///
    /// When disabled, effective listings skip inherited grants entirely;
    /// raw listings still return them verbatim.
    pub inheritance_enabled: bool,

    /// Process-wide default domain, if deployments configure one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_domain_id: Option<DomainId>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            inheritance_enabled: true,
            default_domain_id: None,
        }
    }
}
