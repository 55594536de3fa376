use chrono::{DateTime, Utc};
use pkg_constants::labels;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A logical compartment of the cluster namespace tree.
///
/// Hierarchy metadata (kind, tenant, parent, owner key) travels in `labels`
/// rather than typed fields: the tree is external data, and a missing or
/// unrecognized label must be detectable as corruption by the resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Compartment {
    pub name: String,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    pub created_at: DateTime<Utc>,
}

impl Compartment {
    /// Build a tenant's top-level compartment.
    pub fn root(tenant: &str) -> Self {
        Self {
            name: tenant.to_string(),
            labels: HashMap::from([
                (labels::KIND.to_string(), labels::KIND_ROOT.to_string()),
                (labels::TENANT.to_string(), tenant.to_string()),
                (labels::GENERATED.to_string(), "true".to_string()),
            ]),
            created_at: Utc::now(),
        }
    }

    /// Build a delegated child compartment under `parent`.
    pub fn sub(name: &str, tenant: &str, parent: &str, owner_key: &str) -> Self {
        Self {
            name: name.to_string(),
            labels: HashMap::from([
                (labels::KIND.to_string(), labels::KIND_SUB.to_string()),
                (labels::TENANT.to_string(), tenant.to_string()),
                (labels::PARENT.to_string(), parent.to_string()),
                (labels::OWNER.to_string(), owner_key.to_string()),
                (labels::GENERATED.to_string(), "true".to_string()),
            ]),
            created_at: Utc::now(),
        }
    }

    pub fn kind(&self) -> Option<&str> {
        self.labels.get(labels::KIND).map(String::as_str)
    }

    pub fn tenant(&self) -> Option<&str> {
        self.labels.get(labels::TENANT).map(String::as_str)
    }

    pub fn parent(&self) -> Option<&str> {
        self.labels.get(labels::PARENT).map(String::as_str)
    }

    pub fn owner_key(&self) -> Option<&str> {
        self.labels.get(labels::OWNER).map(String::as_str)
    }

    pub fn is_generated(&self) -> bool {
        self.labels.get(labels::GENERATED).map(String::as_str) == Some("true")
    }
}
