use anyhow::bail;
use pkg_constants::registry;
use pkg_state::client::StateStore;
use pkg_state::watch::EventType;
use pkg_types::compartment::Compartment;
use pkg_types::delegation::{DelegationRequest, DelegationStatus};
use pkg_types::network_policy::NetworkPolicy;
use pkg_types::quota::{Quota, ResourceList};
use pkg_types::rbac::{Role, RoleBinding};
use pkg_types::validate::validate_name;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::resolver::resolve_root_tenant;
use crate::{get_json, get_versioned_json, put_json};

/// Controller that turns delegation requests into live child compartments,
/// keeping the parent/child quota ledger consistent.
///
/// This controller is the sole writer of quota mappings. Parent ledger
/// writes go through the store's compare-and-swap; a lost race surfaces as
/// an error and the whole reconciliation is retried from a fresh read.
pub struct DelegationController {
    store: StateStore,
    resync_interval: Duration,
}

impl DelegationController {
    pub fn new(store: StateStore) -> Self {
        Self {
            store,
            resync_interval: Duration::from_secs(300),
        }
    }

    pub fn with_resync_interval(mut self, interval: Duration) -> Self {
        self.resync_interval = interval;
        self
    }

    /// Start the controller loop as a background task: reconciles each
    /// delegation request as its change events arrive, with a periodic
    /// full resync as a safety net.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "DelegationController started (resync={}s)",
                self.resync_interval.as_secs()
            );
            let mut event_rx = self.store.event_log.subscribe();
            let mut interval = tokio::time::interval(self.resync_interval);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Err(e) = self.resync().await {
                            warn!("DelegationController resync error: {}", e);
                        }
                    }
                    result = event_rx.recv() => {
                        match result {
                            Ok(event)
                                if event.event_type == EventType::Put
                                    && event.key.starts_with(registry::DELEGATION_PREFIX) =>
                            {
                                let bytes = event.value.unwrap_or_default();
                                match serde_json::from_slice::<DelegationRequest>(&bytes) {
                                    Ok(req) => {
                                        if let Err(e) = self.reconcile(&req).await {
                                            warn!(
                                                "Reconcile of delegation {}/{} failed: {}",
                                                req.compartment, req.name, e
                                            );
                                        }
                                    }
                                    Err(e) => {
                                        warn!("Malformed delegation request at {}: {}", event.key, e)
                                    }
                                }
                            }
                            Ok(_) => {}
                            Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => {
                                if let Err(e) = self.resync().await {
                                    warn!("DelegationController resync error: {}", e);
                                }
                                interval.reset();
                            }
                            Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                        }
                    }
                }
            }
        })
    }

    /// One pass over every delegation request in the cluster.
    async fn resync(&self) -> anyhow::Result<()> {
        for (_, bytes) in self.store.list_prefix(registry::DELEGATION_PREFIX).await? {
            let req: DelegationRequest = match serde_json::from_slice(&bytes) {
                Ok(r) => r,
                Err(_) => continue,
            };
            if let Err(e) = self.reconcile(&req).await {
                warn!(
                    "Reconcile of delegation {}/{} failed: {}",
                    req.compartment, req.name, e
                );
            }
        }
        Ok(())
    }

    /// Reconcile one create-or-update of a delegation request. Idempotent:
    /// reconciling the same request twice converges to the same parent and
    /// child ledgers instead of double-allocating.
    ///
    /// Policy violations (quota exceeded, naming collision) land in the
    /// request's status and return `Ok`; store failures return `Err` and
    /// are safe to retry because every step re-reads current state.
    pub async fn reconcile(&self, req: &DelegationRequest) -> anyhow::Result<DelegationStatus> {
        let parent: Compartment =
            match get_json(&self.store, &compartment_key(&req.compartment)).await? {
                Some(c) => c,
                None => bail!("parent compartment {} not found", req.compartment),
            };

        let tenant = resolve_root_tenant(&self.store, &parent.name).await?;
        if !tenant.enabled {
            // Delegation is inert while the tenant is disabled.
            return Ok(req.status.clone());
        }

        validate_name(&req.name)?;
        let demand = &req.resources;

        let parent_quota_key = quota_key(&parent.name);
        let (parent_version, parent_quota): (u64, Quota) =
            match get_versioned_json(&self.store, &parent_quota_key).await? {
                Some(found) => found,
                None => bail!("no quota ledger for parent compartment {}", parent.name),
            };

        if !pkg_ledger::can_afford(&parent_quota.hard, demand) {
            let status = DelegationStatus::failed("quota exceeded");
            self.write_status(req, &status).await?;
            return Ok(status);
        }

        let child_name = req.child_name(&tenant.name);
        validate_name(&child_name)?;
        let owner_key = req.owner_key();

        match get_json::<Compartment>(&self.store, &compartment_key(&child_name)).await? {
            Some(existing) if existing.owner_key() != Some(owner_key.as_str()) => {
                // A foreign compartment occupies the target name. Refuse to
                // take it over.
                let status = DelegationStatus::failed("namespace exists");
                self.write_status(req, &status).await?;
                return Ok(status);
            }
            Some(_) => {}
            None => {
                let child = Compartment::sub(&child_name, &tenant.name, &parent.name, &owner_key);
                put_json(&self.store, &compartment_key(&child_name), &child).await?;
                info!(
                    "Created sub compartment {} under {}",
                    child_name, parent.name
                );
            }
        }

        // The child's quota becomes exactly the demand: an idempotent set,
        // not an additive one.
        let previous_child: ResourceList =
            get_json::<Quota>(&self.store, &quota_key(&child_name))
                .await?
                .map(|q| q.hard)
                .unwrap_or_default();
        put_json(
            &self.store,
            &quota_key(&child_name),
            &Quota::new(&child_name, demand.clone()),
        )
        .await?;

        // parent' = parent - demand + previous child. The correction term
        // makes re-reconciling an existing child idempotent.
        let mut updated_parent = parent_quota;
        updated_parent.hard = pkg_ledger::credit(
            &pkg_ledger::debit(&updated_parent.hard, demand),
            &previous_child,
        );
        let wrote = self
            .store
            .update_cas(
                &parent_quota_key,
                parent_version,
                &serde_json::to_vec(&updated_parent)?,
            )
            .await?;
        if !wrote {
            bail!(
                "quota ledger for {} changed concurrently; reconciliation must be retried",
                parent.name
            );
        }

        if req.inheritance.rbac {
            self.copy_rbac(&parent.name, &child_name).await?;
        }
        if req.inheritance.network_policy {
            self.copy_network_policies(&parent.name, &child_name).await?;
        }

        let status = DelegationStatus::established();
        self.write_status(req, &status).await?;
        Ok(status)
    }

    /// Reclaim the child compartment of a deleted (or expired) delegation
    /// request: credit its quota back to the parent and remove the
    /// compartment, its ledger entry, and its generated policy objects.
    ///
    /// Idempotent: a child that is already gone is success, and the parent
    /// is never credited twice for the same child.
    pub async fn reclaim(&self, req: &DelegationRequest) -> anyhow::Result<()> {
        let parent: Compartment =
            match get_json(&self.store, &compartment_key(&req.compartment)).await? {
                Some(c) => c,
                // The whole tree is gone; nothing left to credit.
                None => return Ok(()),
            };
        let Some(tenant) = parent.tenant() else {
            warn!(
                "Compartment {} has no tenant label; cannot locate child of delegation {}",
                parent.name, req.name
            );
            return Ok(());
        };

        let child_name = req.child_name(tenant);
        let child: Compartment =
            match get_json(&self.store, &compartment_key(&child_name)).await? {
                Some(c) => c,
                None => return Ok(()),
            };
        if !child.is_generated() || child.owner_key() != Some(req.owner_key().as_str()) {
            // Not ours: a foreign compartment happens to hold this name.
            return Ok(());
        }

        // Credit the child's quota back to the parent before tearing down.
        let child_hard: ResourceList = get_json::<Quota>(&self.store, &quota_key(&child_name))
            .await?
            .map(|q| q.hard)
            .unwrap_or_default();
        if let Some((parent_version, mut parent_quota)) =
            get_versioned_json::<Quota>(&self.store, &quota_key(&parent.name)).await?
        {
            parent_quota.hard = pkg_ledger::credit(&parent_quota.hard, &child_hard);
            let wrote = self
                .store
                .update_cas(
                    &quota_key(&parent.name),
                    parent_version,
                    &serde_json::to_vec(&parent_quota)?,
                )
                .await?;
            if !wrote {
                bail!(
                    "quota ledger for {} changed concurrently; reclaim must be retried",
                    parent.name
                );
            }
        }

        // The compartment and its ledger entry go as a unit, together with
        // every policy object generated inside it.
        self.store.delete(&quota_key(&child_name)).await?;
        for prefix in [
            registry::ROLE_PREFIX,
            registry::ROLE_BINDING_PREFIX,
            registry::NETWORK_POLICY_PREFIX,
        ] {
            self.delete_prefix(&format!("{}{}/", prefix, child_name)).await?;
        }
        self.store.delete(&compartment_key(&child_name)).await?;

        info!(
            "Reclaimed compartment {} of delegation {}/{}",
            child_name, req.compartment, req.name
        );
        Ok(())
    }

    /// Copy every role and role binding of the parent compartment into the
    /// child. Each copy gets a fresh identity and lives on independently.
    /// A parent with no policy objects is fine; whatever exists is copied.
    async fn copy_rbac(&self, parent: &str, child: &str) -> anyhow::Result<()> {
        let role_prefix = format!("{}{}/", registry::ROLE_PREFIX, parent);
        for (_, bytes) in self.store.list_prefix(&role_prefix).await? {
            let mut role: Role = serde_json::from_slice(&bytes)?;
            role.id = Uuid::new_v4().to_string();
            role.compartment = child.to_string();
            let key = format!("{}{}/{}", registry::ROLE_PREFIX, child, role.name);
            put_json(&self.store, &key, &role).await?;
        }

        let binding_prefix = format!("{}{}/", registry::ROLE_BINDING_PREFIX, parent);
        for (_, bytes) in self.store.list_prefix(&binding_prefix).await? {
            let mut binding: RoleBinding = serde_json::from_slice(&bytes)?;
            binding.id = Uuid::new_v4().to_string();
            binding.compartment = child.to_string();
            let key = format!("{}{}/{}", registry::ROLE_BINDING_PREFIX, child, binding.name);
            put_json(&self.store, &key, &binding).await?;
        }
        Ok(())
    }

    /// Copy every network policy of the parent compartment into the child,
    /// each with a fresh identity.
    async fn copy_network_policies(&self, parent: &str, child: &str) -> anyhow::Result<()> {
        let prefix = format!("{}{}/", registry::NETWORK_POLICY_PREFIX, parent);
        for (_, bytes) in self.store.list_prefix(&prefix).await? {
            let mut policy: NetworkPolicy = serde_json::from_slice(&bytes)?;
            policy.id = Uuid::new_v4().to_string();
            policy.compartment = child.to_string();
            let key = format!("{}{}/{}", registry::NETWORK_POLICY_PREFIX, child, policy.name);
            put_json(&self.store, &key, &policy).await?;
        }
        Ok(())
    }

    /// Persist a status change on the stored request. Skipped when the
    /// status already matches, or when the request has been deleted in the
    /// meantime (writing would resurrect it).
    async fn write_status(
        &self,
        req: &DelegationRequest,
        status: &DelegationStatus,
    ) -> anyhow::Result<()> {
        if req.status == *status {
            return Ok(());
        }
        let key = delegation_key(&req.compartment, &req.name);
        if self.store.get(&key).await?.is_none() {
            return Ok(());
        }
        let mut updated = req.clone();
        updated.status = status.clone();
        put_json(&self.store, &key, &updated).await?;
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> anyhow::Result<()> {
        for (key, _) in self.store.list_prefix(prefix).await? {
            self.store.delete(&key).await?;
        }
        Ok(())
    }
}

pub(crate) fn compartment_key(name: &str) -> String {
    format!("{}{}", registry::COMPARTMENT_PREFIX, name)
}

pub(crate) fn quota_key(compartment: &str) -> String {
    format!("{}{}", registry::QUOTA_PREFIX, compartment)
}

pub(crate) fn delegation_key(compartment: &str, name: &str) -> String {
    format!("{}{}/{}", registry::DELEGATION_PREFIX, compartment, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pkg_types::delegation::{DelegationState, Inheritance};
    use pkg_types::rbac::{PolicyRule, Subject, SubjectKind};
    use pkg_types::tenant::Tenant;

    async fn temp_store() -> (tempfile::TempDir, StateStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().to_str().unwrap()).await.unwrap();
        (dir, store)
    }

    fn list(pairs: &[(&str, u64)]) -> ResourceList {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn make_tenant(name: &str, enabled: bool) -> Tenant {
        Tenant {
            name: name.to_string(),
            full_name: "Acme Research".to_string(),
            admin: "admin@acme.test".to_string(),
            url: String::new(),
            enabled,
            initial_request: list(&[("cpu", 8000), ("memory", 16_000_000_000)]),
            cluster_network_policy: false,
            status: Default::default(),
            created_at: Utc::now(),
        }
    }

    fn make_request(name: &str, compartment: &str, cpu: u64) -> DelegationRequest {
        DelegationRequest {
            name: name.to_string(),
            compartment: compartment.to_string(),
            resources: list(&[("cpu", cpu)]),
            expiry: None,
            inheritance: Inheritance::default(),
            status: Default::default(),
            created_at: Utc::now(),
        }
    }

    /// Seed a tenant "acme" with its root compartment and ledger.
    async fn seed(store: &StateStore, enabled: bool) {
        let tenant = make_tenant("acme", enabled);
        put_json(store, "/registry/tenants/acme", &tenant).await.unwrap();
        put_json(store, &compartment_key("acme"), &Compartment::root("acme"))
            .await
            .unwrap();
        put_json(
            store,
            &quota_key("acme"),
            &Quota::new("acme", tenant.initial_request.clone()),
        )
        .await
        .unwrap();
    }

    async fn parent_cpu(store: &StateStore) -> u64 {
        let quota: Quota = get_json(store, &quota_key("acme")).await.unwrap().unwrap();
        quota.hard.get("cpu").copied().unwrap_or(0)
    }

    #[tokio::test]
    async fn establishes_child_and_debits_parent() {
        let (_dir, store) = temp_store().await;
        seed(&store, true).await;
        let controller = DelegationController::new(store.clone());

        let req = make_request("dev", "acme", 2000);
        put_json(&store, &delegation_key("acme", "dev"), &req).await.unwrap();
        let status = controller.reconcile(&req).await.unwrap();

        assert_eq!(status.state, DelegationState::Established);
        let child: Compartment = get_json(&store, &compartment_key("acme-dev"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(child.kind(), Some("sub"));
        assert_eq!(child.parent(), Some("acme"));
        assert_eq!(child.owner_key(), Some("acme-dev"));

        let child_quota: Quota = get_json(&store, &quota_key("acme-dev"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(child_quota.hard, list(&[("cpu", 2000)]));
        assert_eq!(parent_cpu(&store).await, 6000);
    }

    #[tokio::test]
    async fn reconcile_is_idempotent() {
        let (_dir, store) = temp_store().await;
        seed(&store, true).await;
        let controller = DelegationController::new(store.clone());

        let req = make_request("dev", "acme", 2000);
        put_json(&store, &delegation_key("acme", "dev"), &req).await.unwrap();
        controller.reconcile(&req).await.unwrap();
        controller.reconcile(&req).await.unwrap();

        let child_quota: Quota = get_json(&store, &quota_key("acme-dev"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(child_quota.hard, list(&[("cpu", 2000)]));
        assert_eq!(parent_cpu(&store).await, 6000);
    }

    #[tokio::test]
    async fn resize_applies_correction_term() {
        let (_dir, store) = temp_store().await;
        seed(&store, true).await;
        let controller = DelegationController::new(store.clone());

        let req = make_request("dev", "acme", 2000);
        put_json(&store, &delegation_key("acme", "dev"), &req).await.unwrap();
        controller.reconcile(&req).await.unwrap();
        assert_eq!(parent_cpu(&store).await, 6000);

        // Shrink the delegation; the freed quota returns to the parent.
        let smaller = make_request("dev", "acme", 1000);
        put_json(&store, &delegation_key("acme", "dev"), &smaller).await.unwrap();
        controller.reconcile(&smaller).await.unwrap();

        let child_quota: Quota = get_json(&store, &quota_key("acme-dev"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(child_quota.hard, list(&[("cpu", 1000)]));
        assert_eq!(parent_cpu(&store).await, 7000);
    }

    #[tokio::test]
    async fn over_allocation_is_rejected_without_mutation() {
        let (_dir, store) = temp_store().await;
        seed(&store, true).await;
        let controller = DelegationController::new(store.clone());

        let req = make_request("huge", "acme", 9000);
        put_json(&store, &delegation_key("acme", "huge"), &req).await.unwrap();
        let status = controller.reconcile(&req).await.unwrap();

        assert_eq!(status.state, DelegationState::Failed);
        assert_eq!(status.message.as_deref(), Some("quota exceeded"));
        assert_eq!(parent_cpu(&store).await, 8000);
        assert!(
            get_json::<Compartment>(&store, &compartment_key("acme-huge"))
                .await
                .unwrap()
                .is_none()
        );
        assert!(get_json::<Quota>(&store, &quota_key("acme-huge"))
            .await
            .unwrap()
            .is_none());

        // The failure is recorded on the stored request.
        let stored: DelegationRequest = get_json(&store, &delegation_key("acme", "huge"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status.state, DelegationState::Failed);
    }

    #[tokio::test]
    async fn collision_with_foreign_compartment_fails() {
        let (_dir, store) = temp_store().await;
        seed(&store, true).await;
        let controller = DelegationController::new(store.clone());

        // A compartment generated by a different delegation already holds
        // the target name.
        let foreign = Compartment::sub("acme-dev", "acme", "acme-other", "acme-other-dev");
        put_json(&store, &compartment_key("acme-dev"), &foreign).await.unwrap();

        let req = make_request("dev", "acme", 1000);
        put_json(&store, &delegation_key("acme", "dev"), &req).await.unwrap();
        let status = controller.reconcile(&req).await.unwrap();

        assert_eq!(status.state, DelegationState::Failed);
        assert_eq!(status.message.as_deref(), Some("namespace exists"));
        assert_eq!(parent_cpu(&store).await, 8000);

        // The foreign compartment is untouched.
        let still: Compartment = get_json(&store, &compartment_key("acme-dev"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(still.owner_key(), Some("acme-other-dev"));
    }

    #[tokio::test]
    async fn disabled_tenant_makes_delegation_inert() {
        let (_dir, store) = temp_store().await;
        seed(&store, false).await;
        let controller = DelegationController::new(store.clone());

        let req = make_request("dev", "acme", 2000);
        let status = controller.reconcile(&req).await.unwrap();

        assert_eq!(status.state, DelegationState::Pending);
        assert!(
            get_json::<Compartment>(&store, &compartment_key("acme-dev"))
                .await
                .unwrap()
                .is_none()
        );
        assert_eq!(parent_cpu(&store).await, 8000);
    }

    #[tokio::test]
    async fn reclaim_restores_parent_and_is_idempotent() {
        let (_dir, store) = temp_store().await;
        seed(&store, true).await;
        let controller = DelegationController::new(store.clone());

        let req = make_request("dev", "acme", 2000);
        put_json(&store, &delegation_key("acme", "dev"), &req).await.unwrap();
        controller.reconcile(&req).await.unwrap();
        assert_eq!(parent_cpu(&store).await, 6000);

        controller.reclaim(&req).await.unwrap();
        assert_eq!(parent_cpu(&store).await, 8000);
        assert!(
            get_json::<Compartment>(&store, &compartment_key("acme-dev"))
                .await
                .unwrap()
                .is_none()
        );
        assert!(get_json::<Quota>(&store, &quota_key("acme-dev"))
            .await
            .unwrap()
            .is_none());

        // Second reclaim: success, and no double credit.
        controller.reclaim(&req).await.unwrap();
        assert_eq!(parent_cpu(&store).await, 8000);
    }

    #[tokio::test]
    async fn reclaim_leaves_foreign_compartment_alone() {
        let (_dir, store) = temp_store().await;
        seed(&store, true).await;
        let controller = DelegationController::new(store.clone());

        let foreign = Compartment::sub("acme-dev", "acme", "acme-other", "acme-other-dev");
        put_json(&store, &compartment_key("acme-dev"), &foreign).await.unwrap();

        let req = make_request("dev", "acme", 2000);
        controller.reclaim(&req).await.unwrap();

        assert!(
            get_json::<Compartment>(&store, &compartment_key("acme-dev"))
                .await
                .unwrap()
                .is_some()
        );
        assert_eq!(parent_cpu(&store).await, 8000);
    }

    #[tokio::test]
    async fn conservation_across_lifecycle() {
        let (_dir, store) = temp_store().await;
        seed(&store, true).await;
        let controller = DelegationController::new(store.clone());

        for (name, cpu) in [("a", 1000), ("b", 2000), ("c", 500)] {
            let req = make_request(name, "acme", cpu);
            put_json(&store, &delegation_key("acme", name), &req).await.unwrap();
            controller.reconcile(&req).await.unwrap();
        }
        // parent + Σ children == initial allocation
        let mut total = parent_cpu(&store).await;
        for name in ["acme-a", "acme-b", "acme-c"] {
            let quota: Quota = get_json(&store, &quota_key(name)).await.unwrap().unwrap();
            total += quota.hard.get("cpu").copied().unwrap_or(0);
        }
        assert_eq!(total, 8000);

        for (name, _) in [("a", 0), ("b", 0), ("c", 0)] {
            let req = make_request(name, "acme", 0);
            controller.reclaim(&req).await.unwrap();
        }
        assert_eq!(parent_cpu(&store).await, 8000);
    }

    #[tokio::test]
    async fn inheritance_copies_policies_with_fresh_identity() {
        let (_dir, store) = temp_store().await;
        seed(&store, true).await;
        let controller = DelegationController::new(store.clone());

        let role = Role {
            id: "role-original".to_string(),
            name: "viewer".to_string(),
            compartment: "acme".to_string(),
            rules: vec![PolicyRule {
                api_groups: vec!["".to_string()],
                resources: vec!["delegations".to_string()],
                verbs: vec!["get".to_string(), "list".to_string()],
            }],
        };
        put_json(&store, "/registry/roles/acme/viewer", &role).await.unwrap();
        let binding = RoleBinding {
            id: "binding-original".to_string(),
            name: "viewers".to_string(),
            compartment: "acme".to_string(),
            role_ref: "viewer".to_string(),
            subjects: vec![Subject {
                kind: SubjectKind::User,
                name: "alice".to_string(),
                compartment: None,
            }],
        };
        put_json(&store, "/registry/rolebindings/acme/viewers", &binding)
            .await
            .unwrap();

        let mut req = make_request("dev", "acme", 1000);
        req.inheritance = Inheritance {
            rbac: true,
            network_policy: false,
        };
        put_json(&store, &delegation_key("acme", "dev"), &req).await.unwrap();
        controller.reconcile(&req).await.unwrap();

        let copied: Role = get_json(&store, "/registry/roles/acme-dev/viewer")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(copied.compartment, "acme-dev");
        assert_ne!(copied.id, "role-original");
        assert_eq!(copied.rules.len(), 1);

        let copied_binding: RoleBinding =
            get_json(&store, "/registry/rolebindings/acme-dev/viewers")
                .await
                .unwrap()
                .unwrap();
        assert_ne!(copied_binding.id, "binding-original");

        // Network policy inheritance was not requested; nothing copied.
        assert!(store
            .list_prefix("/registry/networkpolicies/acme-dev/")
            .await
            .unwrap()
            .is_empty());
    }
}
