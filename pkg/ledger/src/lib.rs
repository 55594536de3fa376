//! Pure arithmetic over compartment quota ledgers.
//!
//! All operations are total over well-formed non-negative quantities. A
//! debit that would go negative is a programming error (callers must check
//! `can_afford` first) and is asserted against, not surfaced as a result.

use pkg_types::quota::ResourceList;

/// True iff every resource kind in `demand` fits within `parent`.
/// A kind absent from `parent` affords nothing.
pub fn can_afford(parent: &ResourceList, demand: &ResourceList) -> bool {
    demand
        .iter()
        .all(|(kind, qty)| parent.get(kind).copied().unwrap_or(0) >= *qty)
}

/// Subtract `demand` from `parent`, kind by kind.
pub fn debit(parent: &ResourceList, demand: &ResourceList) -> ResourceList {
    let mut result = parent.clone();
    for (kind, qty) in demand {
        let available = result.get(kind).copied().unwrap_or(0);
        assert!(
            available >= *qty,
            "ledger underflow: debit of {} {} against {}",
            qty,
            kind,
            available
        );
        result.insert(kind.clone(), available - qty);
    }
    result
}

/// Add `delta` to `target`, kind by kind. Kinds absent from `target` are
/// introduced at the delta's quantity.
pub fn credit(target: &ResourceList, delta: &ResourceList) -> ResourceList {
    let mut result = target.clone();
    for (kind, qty) in delta {
        let current = result.get(kind).copied().unwrap_or(0);
        let sum = current
            .checked_add(*qty)
            .unwrap_or_else(|| panic!("ledger overflow crediting {} {}", qty, kind));
        result.insert(kind.clone(), sum);
    }
    result
}
