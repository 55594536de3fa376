//! Compartment tree traversal limits.

/// Maximum number of parent hops when resolving the root of a compartment
/// tree. The tree has no enforced depth limit, so a corrupted parent chain
/// could loop; bounding the walk is cheaper than keeping a visited set and
/// the bound is far larger than any legitimate hierarchy.
pub const MAX_TRAVERSAL_DEPTH: usize = 255;
