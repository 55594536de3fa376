use serde::{Deserialize, Serialize};

// --- Policy rules ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyRule {
    /// API groups this rule applies to (e.g., "" for core, "*" for all)
    pub api_groups: Vec<String>,
    /// Resource types (e.g., "compartments", "delegations", "*" for all)
    pub resources: Vec<String>,
    /// Allowed verbs (e.g., "get", "list", "create", "update", "delete", "*" for all)
    pub verbs: Vec<String>,
}

// --- Role ---

/// Namespaced role. Inherited copies carry a fresh `id`; a copy is an
/// independent object with no live link to the parent's original.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub compartment: String,
    pub rules: Vec<PolicyRule>,
}

// --- Subject ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SubjectKind {
    User,
    ServiceAccount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub kind: SubjectKind,
    pub name: String,
    #[serde(default)]
    pub compartment: Option<String>,
}

// --- RoleBinding ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleBinding {
    pub id: String,
    pub name: String,
    pub compartment: String,
    pub role_ref: String,
    pub subjects: Vec<Subject>,
}
