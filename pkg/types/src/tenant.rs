use crate::quota::ResourceList;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tenant of the cluster. Owns one root compartment of the same name and
/// every sub-compartment delegated beneath it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    /// Admin identity; a role binding for this user is placed in the
    /// tenant's root compartment.
    pub admin: String,
    #[serde(default)]
    pub url: String,
    /// Delegations under a disabled tenant are inert.
    pub enabled: bool,
    /// Initial hard quota for the root compartment.
    #[serde(default)]
    pub initial_request: ResourceList,
    /// Whether the baseline isolation network policy is installed in the
    /// root compartment.
    #[serde(default)]
    pub cluster_network_policy: bool,
    #[serde(default)]
    pub status: TenantStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TenantState {
    Pending,
    Established,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantStatus {
    pub state: TenantState,
    #[serde(default)]
    pub message: Option<String>,
}

impl Default for TenantStatus {
    fn default() -> Self {
        Self {
            state: TenantState::Pending,
            message: None,
        }
    }
}
