//! Light diversity ranking over a candidate list.

use std::collections::HashSet;

use crate::mapper::{CatalogItem, MAX_MAPPED_ITEMS};
use crate::slot::Slot;

pub const DEFAULT_RANKED_ITEMS: usize = 6;

/// One item per slot first, then the rest in input order.
/// Returns at most `min(n, 10)` items.
pub fn diversify(items: &[CatalogItem], n: usize) -> Vec<CatalogItem> {
    let cap = n.min(MAX_MAPPED_ITEMS);
    let mut seen: HashSet<Slot> = HashSet::new();
    let mut first_pass = Vec::new();
    let mut rest = Vec::new();

    for item in items {
        if seen.insert(item.slot) {
            first_pass.push(item.clone());
        } else {
            rest.push(item.clone());
        }
    }

    first_pass.into_iter().chain(rest).take(cap).collect()
}
