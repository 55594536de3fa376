use serde::{Deserialize, Serialize};
use slatedb::Db;
use slatedb::object_store::local::LocalFileSystem;
use slatedb::object_store::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::watch::{EventLog, EventType};

/// On-disk envelope around every stored object. The version token backs the
/// store's compare-and-swap: conditional writes that name a stale version
/// lose, and the caller re-reads and retries.
#[derive(Debug, Serialize, Deserialize)]
struct Stored {
    version: u64,
    data: serde_json::Value,
}

/// Persistent state store backed by SlateDB on a local filesystem.
/// In production this would use S3/R2/MinIO via the `object_store` crate.
///
/// Values must be JSON. Every mutation is broadcast on `event_log`.
#[derive(Clone)]
pub struct StateStore {
    db: Db,
    pub event_log: EventLog,
    // Serializes read-modify-write cycles so version bumps are atomic.
    write_lock: Arc<Mutex<()>>,
}

impl StateStore {
    /// Open (or create) a state store rooted at `path` on the local filesystem.
    pub async fn new(path: &str) -> anyhow::Result<Self> {
        info!("Opening SlateDB state store at {}", path);

        // Ensure the data directory exists before opening the object store
        std::fs::create_dir_all(path)
            .map_err(|e| anyhow::anyhow!("Failed to create data directory {}: {}", path, e))?;

        let object_store = Arc::new(
            LocalFileSystem::new_with_prefix(path)
                .map_err(|e| anyhow::anyhow!("Failed to create local object store: {}", e))?,
        );
        let db = Db::open(Path::from("/"), object_store)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to open SlateDB: {}", e))?;
        Ok(Self {
            db,
            event_log: EventLog::new(),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Store a JSON value under the given key, bumping its version.
    /// Returns the version written.
    pub async fn put(&self, key: &str, value: &[u8]) -> anyhow::Result<u64> {
        let data: serde_json::Value = serde_json::from_slice(value)
            .map_err(|e| anyhow::anyhow!("Value for {} is not JSON: {}", key, e))?;

        let _guard = self.write_lock.lock().await;
        let version = match self.read_stored(key).await? {
            Some(stored) => stored.version + 1,
            None => 1,
        };
        self.write_stored(key, &Stored { version, data }).await?;
        drop(_guard);

        self.event_log
            .emit(EventType::Put, key.to_string(), Some(value.to_vec()));
        Ok(version)
    }

    /// Conditionally replace the value under `key`: the write only lands if
    /// the stored version still equals `expected_version`. Returns `false`
    /// when the write lost the race (or the key has vanished); the caller
    /// must re-read and retry the whole operation, never merge by hand.
    pub async fn update_cas(
        &self,
        key: &str,
        expected_version: u64,
        value: &[u8],
    ) -> anyhow::Result<bool> {
        let data: serde_json::Value = serde_json::from_slice(value)
            .map_err(|e| anyhow::anyhow!("Value for {} is not JSON: {}", key, e))?;

        let _guard = self.write_lock.lock().await;
        match self.read_stored(key).await? {
            Some(stored) if stored.version == expected_version => {
                self.write_stored(
                    key,
                    &Stored {
                        version: expected_version + 1,
                        data,
                    },
                )
                .await?;
                drop(_guard);
                self.event_log
                    .emit(EventType::Put, key.to_string(), Some(value.to_vec()));
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Retrieve the value for a key, or `None` if it does not exist.
    pub async fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self
            .read_stored(key)
            .await?
            .map(|stored| serde_json::to_vec(&stored.data))
            .transpose()?)
    }

    /// Retrieve a value together with its version token, for a later
    /// `update_cas` on the same key.
    pub async fn get_versioned(&self, key: &str) -> anyhow::Result<Option<(u64, Vec<u8>)>> {
        match self.read_stored(key).await? {
            Some(stored) => Ok(Some((stored.version, serde_json::to_vec(&stored.data)?))),
            None => Ok(None),
        }
    }

    /// Delete a key from the store. Deleting an absent key is a no-op.
    /// The Delete event carries the last stored value.
    pub async fn delete(&self, key: &str) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().await;
        let last = match self.read_stored(key).await? {
            Some(stored) => Some(serde_json::to_vec(&stored.data)?),
            None => return Ok(()),
        };
        self.db
            .delete(key.as_bytes())
            .await
            .map_err(|e| anyhow::anyhow!("SlateDB delete failed: {}", e))?;
        drop(_guard);

        self.event_log.emit(EventType::Delete, key.to_string(), last);
        Ok(())
    }

    /// List all key-value pairs whose keys start with `prefix`.
    /// Returns them as `(key_string, raw_bytes)` with envelopes stripped.
    pub async fn list_prefix(&self, prefix: &str) -> anyhow::Result<Vec<(String, Vec<u8>)>> {
        let mut results = Vec::new();
        let mut iter = self
            .db
            .scan_prefix(prefix.as_bytes())
            .await
            .map_err(|e| anyhow::anyhow!("SlateDB scan_prefix failed: {}", e))?;

        while let Ok(Some(kv)) = iter.next().await {
            let key = String::from_utf8_lossy(&kv.key).to_string();
            let stored: Stored = serde_json::from_slice(&kv.value)
                .map_err(|e| anyhow::anyhow!("Corrupt envelope at {}: {}", key, e))?;
            results.push((key, serde_json::to_vec(&stored.data)?));
        }
        Ok(results)
    }

    /// Gracefully close the state store.
    pub async fn close(self) -> anyhow::Result<()> {
        info!("Closing SlateDB state store");
        self.db
            .close()
            .await
            .map_err(|e| anyhow::anyhow!("SlateDB close failed: {}", e))
    }

    async fn read_stored(&self, key: &str) -> anyhow::Result<Option<Stored>> {
        match self.db.get(key.as_bytes()).await {
            Ok(Some(bytes)) => Ok(Some(serde_json::from_slice(&bytes).map_err(|e| {
                anyhow::anyhow!("Corrupt envelope at {}: {}", key, e)
            })?)),
            Ok(None) => Ok(None),
            Err(e) => Err(anyhow::anyhow!("SlateDB get failed: {}", e)),
        }
    }

    async fn write_stored(&self, key: &str, stored: &Stored) -> anyhow::Result<()> {
        let bytes = serde_json::to_vec(stored)?;
        self.db
            .put(key.as_bytes(), &bytes)
            .await
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("SlateDB put failed: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watch::EventType;

    async fn temp_store() -> (tempfile::TempDir, StateStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().to_str().unwrap()).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn put_get_roundtrip() {
        let (_dir, store) = temp_store().await;
        store.put("/registry/tenants/acme", br#"{"a":1}"#).await.unwrap();
        let value = store.get("/registry/tenants/acme").await.unwrap().unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&value).unwrap();
        assert_eq!(parsed["a"], 1);
        assert!(store.get("/registry/tenants/ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_bumps_version() {
        let (_dir, store) = temp_store().await;
        assert_eq!(store.put("/k", br#"{"v":1}"#).await.unwrap(), 1);
        assert_eq!(store.put("/k", br#"{"v":2}"#).await.unwrap(), 2);
        let (version, _) = store.get_versioned("/k").await.unwrap().unwrap();
        assert_eq!(version, 2);
    }

    #[tokio::test]
    async fn cas_rejects_stale_version() {
        let (_dir, store) = temp_store().await;
        store.put("/k", br#"{"v":1}"#).await.unwrap();
        let (version, _) = store.get_versioned("/k").await.unwrap().unwrap();

        assert!(store.update_cas("/k", version, br#"{"v":2}"#).await.unwrap());
        // The first writer bumped the version; the stale token loses.
        assert!(!store.update_cas("/k", version, br#"{"v":3}"#).await.unwrap());

        let value = store.get("/k").await.unwrap().unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&value).unwrap();
        assert_eq!(parsed["v"], 2);
    }

    #[tokio::test]
    async fn cas_on_absent_key_fails() {
        let (_dir, store) = temp_store().await;
        assert!(!store.update_cas("/missing", 1, br#"{}"#).await.unwrap());
    }

    #[tokio::test]
    async fn delete_emits_last_value() {
        let (_dir, store) = temp_store().await;
        store.put("/k", br#"{"v":7}"#).await.unwrap();

        let mut rx = store.event_log.subscribe();
        store.delete("/k").await.unwrap();
        // Deleting again is a no-op and emits nothing.
        store.delete("/k").await.unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type, EventType::Delete);
        let parsed: serde_json::Value = serde_json::from_slice(&event.value.unwrap()).unwrap();
        assert_eq!(parsed["v"], 7);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn list_prefix_strips_envelopes() {
        let (_dir, store) = temp_store().await;
        store.put("/registry/quotas/a", br#"{"hard":{}}"#).await.unwrap();
        store.put("/registry/quotas/b", br#"{"hard":{}}"#).await.unwrap();
        store.put("/registry/tenants/x", br#"{}"#).await.unwrap();

        let entries = store.list_prefix("/registry/quotas/").await.unwrap();
        assert_eq!(entries.len(), 2);
        for (_, value) in entries {
            let parsed: serde_json::Value = serde_json::from_slice(&value).unwrap();
            assert!(parsed.get("version").is_none());
        }
    }
}
