//! Controllers that reconcile the multi-tenant compartment tree: delegation
//! of sub-compartments, root resolution, tenant provisioning, and expiry.

pub mod delegation;
pub mod expiry;
pub mod resolver;
pub mod tenant;

use pkg_state::client::StateStore;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub(crate) async fn get_json<T: DeserializeOwned>(
    store: &StateStore,
    key: &str,
) -> anyhow::Result<Option<T>> {
    match store.get(key).await? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

pub(crate) async fn get_versioned_json<T: DeserializeOwned>(
    store: &StateStore,
    key: &str,
) -> anyhow::Result<Option<(u64, T)>> {
    match store.get_versioned(key).await? {
        Some((version, bytes)) => Ok(Some((version, serde_json::from_slice(&bytes)?))),
        None => Ok(None),
    }
}

pub(crate) async fn put_json<T: Serialize>(
    store: &StateStore,
    key: &str,
    value: &T,
) -> anyhow::Result<u64> {
    store.put(key, &serde_json::to_vec(value)?).await
}
