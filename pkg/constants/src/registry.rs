//! etcd-style registry key prefixes.

pub const COMPARTMENT_PREFIX: &str = "/registry/compartments/";

pub const QUOTA_PREFIX: &str = "/registry/quotas/";

/// Delegation requests are keyed `/registry/delegations/{compartment}/{name}`.
pub const DELEGATION_PREFIX: &str = "/registry/delegations/";

pub const TENANT_PREFIX: &str = "/registry/tenants/";

/// Policy objects are keyed `{prefix}{compartment}/{name}`.
pub const ROLE_PREFIX: &str = "/registry/roles/";
pub const ROLE_BINDING_PREFIX: &str = "/registry/rolebindings/";
pub const NETWORK_POLICY_PREFIX: &str = "/registry/networkpolicies/";
