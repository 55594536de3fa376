//! Data model for the nestns multi-tenant compartment tree.

pub mod compartment;
pub mod config;
pub mod delegation;
pub mod network_policy;
pub mod quota;
pub mod rbac;
pub mod tenant;
pub mod validate;
