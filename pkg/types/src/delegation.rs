use crate::quota::ResourceList;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A declarative request, living inside a compartment, to carve out one
/// child compartment with a requested quota.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelegationRequest {
    pub name: String,
    /// Compartment the request lives in, and parent of the child it asks for.
    pub compartment: String,
    /// Requested hard quota for the child compartment.
    #[serde(default)]
    pub resources: ResourceList,
    /// When set, the delegation is reclaimed once this timestamp elapses.
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
    #[serde(default)]
    pub inheritance: Inheritance,
    #[serde(default)]
    pub status: DelegationStatus,
    pub created_at: DateTime<Utc>,
}

impl DelegationRequest {
    /// Identity stamped on the generated child compartment. A child whose
    /// owner label differs was generated by a different delegation.
    pub fn owner_key(&self) -> String {
        format!("{}-{}", self.compartment, self.name)
    }

    /// Name of the child compartment this request generates.
    pub fn child_name(&self, tenant: &str) -> String {
        format!("{}-{}", tenant, self.name)
    }
}

/// Which policy objects the child compartment inherits from its parent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inheritance {
    #[serde(default)]
    pub rbac: bool,
    #[serde(default)]
    pub network_policy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelegationState {
    Pending,
    Established,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationStatus {
    pub state: DelegationState,
    #[serde(default)]
    pub message: Option<String>,
}

impl Default for DelegationStatus {
    fn default() -> Self {
        Self {
            state: DelegationState::Pending,
            message: None,
        }
    }
}

impl DelegationStatus {
    pub fn established() -> Self {
        Self {
            state: DelegationState::Established,
            message: Some("delegation established".to_string()),
        }
    }

    pub fn failed(message: &str) -> Self {
        Self {
            state: DelegationState::Failed,
            message: Some(message.to_string()),
        }
    }
}
