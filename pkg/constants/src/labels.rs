//! Well-known compartment labels.
//!
//! Hierarchy metadata travels as labels on the Compartment object so that
//! externally corrupted trees are observable instead of unrepresentable.

/// Label carrying the compartment kind: `root` or `sub`.
pub const KIND: &str = "nestns.io/kind";

/// Label naming the tenant that owns the tree this compartment belongs to.
pub const TENANT: &str = "nestns.io/tenant";

/// Label naming the parent compartment of a `sub` compartment.
pub const PARENT: &str = "nestns.io/parent";

/// Label carrying the identity of the delegation request that generated
/// a `sub` compartment. Used to detect naming collisions.
pub const OWNER: &str = "nestns.io/owner";

/// Marks compartments and policy objects created by the controller itself.
pub const GENERATED: &str = "nestns.io/generated";

/// Kind label value for a tenant's top-level compartment.
pub const KIND_ROOT: &str = "root";

/// Kind label value for a delegated child compartment.
pub const KIND_SUB: &str = "sub";
