//! Reconstruction of variant groups from flat child → parent references.
//!
//! The upstream only links a variant back to its base item. Groups are
//! rebuilt with a single index from parent SKU to children; entries stay in
//! flat vectors and never point at each other.

use std::collections::{HashMap, HashSet};

use crate::types::{Item, MergedItemEntry, Variant};
use crate::warning::DataWarning;

#[derive(Debug, Default)]
pub struct GroupOutcome {
    pub items: Vec<Item>,
    pub warnings: Vec<DataWarning>,
}

/// Groups merged entries into final items.
///
/// Entries without a parent reference are top-level items, kept in input
/// order. Entries whose parent is a top-level item become that item's
/// variants, in input order. An entry whose parent is missing, is itself a
/// variant, or is the entry itself is promoted to a standalone top-level item
/// at its own position, so every SKU appears exactly once in the output.
#[must_use]
pub fn group(entries: Vec<MergedItemEntry>) -> GroupOutcome {
    let top_level: HashSet<String> = entries
        .iter()
        .filter(|e| e.parent_sku_id.is_none())
        .map(|e| e.sku_id.clone())
        .collect();

    let mut warnings = Vec::new();
    let mut groups: HashMap<String, Vec<Variant>> = HashMap::new();
    let mut candidates = Vec::new();

    for entry in entries {
        match entry.parent_sku_id.clone() {
            None => candidates.push(entry),
            Some(parent) if top_level.contains(&parent) => {
                groups.entry(parent).or_default().push(into_variant(entry));
            }
            Some(parent) => {
                tracing::warn!(
                    sku_id = %entry.sku_id,
                    parent_sku_id = %parent,
                    "variant parent is not a top-level item; promoting to standalone item"
                );
                warnings.push(DataWarning::DanglingParent {
                    sku_id: entry.sku_id.clone(),
                    parent_sku_id: parent,
                });
                candidates.push(entry);
            }
        }
    }

    let items = candidates
        .into_iter()
        .map(|entry| {
            let variants = groups.remove(&entry.sku_id);
            into_item(entry, variants)
        })
        .collect();

    GroupOutcome { items, warnings }
}

fn into_variant(entry: MergedItemEntry) -> Variant {
    Variant {
        sku_id: entry.sku_id,
        names: entry.names,
        preview: entry.preview,
    }
}

fn into_item(entry: MergedItemEntry, variants: Option<Vec<Variant>>) -> Item {
    let variant_count = variants.as_ref().map_or(0, Vec::len);
    Item {
        sku_id: entry.sku_id,
        item_type: entry.item_type,
        names: entry.names,
        categories: entry.categories,
        price: entry.price,
        has_variants: variant_count > 0,
        variant_count,
        variants,
        preview: entry.preview,
    }
}

#[cfg(test)]
#[path = "group_test.rs"]
mod tests;
