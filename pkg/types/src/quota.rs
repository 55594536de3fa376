use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resource kind → quantity. Quantities are exact integers (millicores,
/// bytes); allocation arithmetic never touches floating point.
pub type ResourceList = BTreeMap<String, u64>;

/// Hard resource ceiling attached 1:1 to a compartment.
///
/// A quota never outlives its compartment: both are created and deleted
/// as a unit by the delegation controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quota {
    pub name: String,
    pub compartment: String,
    pub hard: ResourceList,
    pub created_at: DateTime<Utc>,
}

impl Quota {
    pub fn new(compartment: &str, hard: ResourceList) -> Self {
        Self {
            name: compartment.to_string(),
            compartment: compartment.to_string(),
            hard,
            created_at: Utc::now(),
        }
    }
}
