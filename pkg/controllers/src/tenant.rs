use pkg_constants::{registry, tenancy};
use pkg_state::client::StateStore;
use pkg_state::watch::EventType;
use pkg_types::compartment::Compartment;
use pkg_types::network_policy::{IngressRule, NetworkPolicy, NetworkPolicyPeer, PolicyType};
use pkg_types::quota::Quota;
use pkg_types::rbac::{RoleBinding, Subject, SubjectKind};
use pkg_types::tenant::Tenant;
use pkg_types::validate::validate_name;
use tracing::{info, warn};
use uuid::Uuid;

use crate::delegation::{compartment_key, quota_key};
use crate::{get_json, put_json};

/// Controller that provisions a tenant's root compartment: the compartment
/// itself, its quota ledger seeded from the initial request, the admin role
/// binding, and the optional baseline isolation policy.
pub struct TenantController {
    store: StateStore,
}

impl TenantController {
    pub fn new(store: StateStore) -> Self {
        Self { store }
    }

    /// Start the controller loop as a background task: provisions on tenant
    /// Put events, tears down on Delete events.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            info!("TenantController started");
            let mut event_rx = self.store.event_log.subscribe();
            loop {
                let event = match event_rx.recv().await {
                    Ok(event) if event.key.starts_with(registry::TENANT_PREFIX) => event,
                    Ok(_) => continue,
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                };
                let tenant = match serde_json::from_slice::<Tenant>(
                    &event.value.clone().unwrap_or_default(),
                ) {
                    Ok(t) => t,
                    Err(e) => {
                        warn!("Malformed tenant at {}: {}", event.key, e);
                        continue;
                    }
                };
                let result = match event.event_type {
                    EventType::Put => self.reconcile(&tenant).await,
                    EventType::Delete => self.cleanup(&tenant).await,
                };
                if let Err(e) = result {
                    warn!("TenantController error for {}: {}", tenant.name, e);
                }
            }
        })
    }

    /// Ensure the tenant's root compartment and its satellites exist.
    ///
    /// The quota ledger is seeded only when absent: it is debited by live
    /// delegations afterwards, and resetting it here would wipe the debits.
    pub async fn reconcile(&self, tenant: &Tenant) -> anyhow::Result<()> {
        validate_name(&tenant.name)?;

        if get_json::<Compartment>(&self.store, &compartment_key(&tenant.name))
            .await?
            .is_none()
        {
            put_json(
                &self.store,
                &compartment_key(&tenant.name),
                &Compartment::root(&tenant.name),
            )
            .await?;
            info!("Created root compartment for tenant {}", tenant.name);
        }

        if get_json::<Quota>(&self.store, &quota_key(&tenant.name))
            .await?
            .is_none()
        {
            put_json(
                &self.store,
                &quota_key(&tenant.name),
                &Quota::new(&tenant.name, tenant.initial_request.clone()),
            )
            .await?;
        }

        self.ensure_admin_binding(tenant).await?;
        self.apply_baseline_policy(tenant).await?;
        Ok(())
    }

    /// Tear down everything under the tenant's root compartment. Deleting
    /// the delegation requests first lets the expiry coordinator reclaim
    /// each sub-compartment through the normal path.
    pub async fn cleanup(&self, tenant: &Tenant) -> anyhow::Result<()> {
        let name = &tenant.name;
        self.delete_prefix(&format!("{}{}/", registry::DELEGATION_PREFIX, name))
            .await?;
        for prefix in [
            registry::ROLE_PREFIX,
            registry::ROLE_BINDING_PREFIX,
            registry::NETWORK_POLICY_PREFIX,
        ] {
            self.delete_prefix(&format!("{}{}/", prefix, name)).await?;
        }
        self.store.delete(&quota_key(name)).await?;
        self.store.delete(&compartment_key(name)).await?;
        info!("Cleaned up root compartment of tenant {}", name);
        Ok(())
    }

    async fn ensure_admin_binding(&self, tenant: &Tenant) -> anyhow::Result<()> {
        let key = format!(
            "{}{}/{}",
            registry::ROLE_BINDING_PREFIX,
            tenant.name,
            tenancy::TENANT_ADMIN_ROLE
        );
        if get_json::<RoleBinding>(&self.store, &key).await?.is_some() {
            return Ok(());
        }
        let binding = RoleBinding {
            id: Uuid::new_v4().to_string(),
            name: tenancy::TENANT_ADMIN_ROLE.to_string(),
            compartment: tenant.name.clone(),
            role_ref: tenancy::TENANT_ADMIN_ROLE.to_string(),
            subjects: vec![Subject {
                kind: SubjectKind::User,
                name: tenant.admin.clone(),
                compartment: None,
            }],
        };
        put_json(&self.store, &key, &binding).await?;
        Ok(())
    }

    /// Install the baseline ingress policy when the tenant asks for
    /// cluster-level isolation; remove it when the tenant opts back out.
    async fn apply_baseline_policy(&self, tenant: &Tenant) -> anyhow::Result<()> {
        let key = format!(
            "{}{}/{}",
            registry::NETWORK_POLICY_PREFIX,
            tenant.name,
            tenancy::BASELINE_NETWORK_POLICY
        );
        if !tenant.cluster_network_policy {
            self.store.delete(&key).await?;
            return Ok(());
        }
        if get_json::<NetworkPolicy>(&self.store, &key).await?.is_some() {
            return Ok(());
        }

        let same_tenant = std::collections::HashMap::from([(
            pkg_constants::labels::TENANT.to_string(),
            tenant.name.clone(),
        )]);
        let policy = NetworkPolicy {
            id: Uuid::new_v4().to_string(),
            name: tenancy::BASELINE_NETWORK_POLICY.to_string(),
            compartment: tenant.name.clone(),
            policy_types: vec![PolicyType::Ingress],
            ingress: vec![IngressRule {
                from: vec![NetworkPolicyPeer {
                    compartment_selector: Some(same_tenant),
                    ip_block: None,
                }],
                ports: vec![],
            }],
            egress: vec![],
            created_at: chrono::Utc::now(),
        };
        put_json(&self.store, &key, &policy).await?;
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> anyhow::Result<()> {
        for (key, _) in self.store.list_prefix(prefix).await? {
            self.store.delete(&key).await?;
        }
        Ok(())
    }
}
