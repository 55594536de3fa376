use pkg_constants::hierarchy::MAX_TRAVERSAL_DEPTH;
use pkg_constants::{labels, registry};
use pkg_state::client::StateStore;
use pkg_types::compartment::Compartment;
use pkg_types::tenant::Tenant;
use thiserror::Error;

use crate::get_json;

/// Failures while walking a compartment's ancestor chain.
///
/// The structural variants indicate corruption of the tree by something
/// outside this component; they are fatal for the resolution attempt and
/// must not be retried blindly. Store errors are transient.
#[derive(Debug, Error)]
pub enum HierarchyError {
    #[error("compartment {0} not found")]
    CompartmentNotFound(String),

    #[error("no tenant named {0} for its root compartment")]
    TenantNotFound(String),

    #[error("malformed hierarchy: compartment {0} is missing the {1} label")]
    MissingLabel(String, &'static str),

    #[error("malformed hierarchy: compartment {0} has unrecognized kind {1:?}")]
    UnknownKind(String, String),

    #[error("possible cycle: no root within {1} hops of compartment {0}")]
    DepthExceeded(String, usize),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl HierarchyError {
    /// True for errors that indicate external corruption of the tree
    /// rather than a transient store failure.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::MissingLabel(..) | Self::UnknownKind(..) | Self::DepthExceeded(..)
        )
    }
}

/// Walk parent pointers upward from `start` until a root compartment is
/// found, then return the tenant of the same name.
///
/// The walk is bounded: a corrupted chain that loops is reported as
/// `DepthExceeded` instead of spinning forever.
pub async fn resolve_root_tenant(
    store: &StateStore,
    start: &str,
) -> Result<Tenant, HierarchyError> {
    let mut current = start.to_string();

    for _ in 0..MAX_TRAVERSAL_DEPTH {
        let key = format!("{}{}", registry::COMPARTMENT_PREFIX, current);
        let compartment: Compartment = get_json(store, &key)
            .await?
            .ok_or_else(|| HierarchyError::CompartmentNotFound(current.clone()))?;

        match compartment.kind() {
            None => return Err(HierarchyError::MissingLabel(current, labels::KIND)),
            Some(labels::KIND_ROOT) => {
                let tenant_key = format!("{}{}", registry::TENANT_PREFIX, compartment.name);
                return get_json::<Tenant>(store, &tenant_key)
                    .await?
                    .ok_or(HierarchyError::TenantNotFound(compartment.name));
            }
            Some(labels::KIND_SUB) => match compartment.parent() {
                Some(parent) => current = parent.to_string(),
                None => return Err(HierarchyError::MissingLabel(current, labels::PARENT)),
            },
            Some(other) => {
                let other = other.to_string();
                return Err(HierarchyError::UnknownKind(current, other));
            }
        }
    }

    Err(HierarchyError::DepthExceeded(
        start.to_string(),
        MAX_TRAVERSAL_DEPTH,
    ))
}
