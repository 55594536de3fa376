//! Tenant provisioning constants.

/// Name of the role binding granting a tenant's admin access to the
/// tenant's root compartment.
pub const TENANT_ADMIN_ROLE: &str = "nestns:tenant-admin";

/// Name of the network policy installed in every tenant's root compartment
/// when the tenant requests cluster-level isolation.
pub const BASELINE_NETWORK_POLICY: &str = "baseline";
