//! Bilingual merge of two per-locale category trees.
//!
//! The merge is a full outer join on `sku_id`: an entry present in only one
//! tree is kept with the other locale's strings left unset. Locale-invariant
//! fields come from the primary tree whenever it has the entry.

use std::collections::HashMap;

use crate::locale::Locale;
use crate::types::{MergedItemEntry, RawCategoryTree, RawItemEntry};
use crate::warning::DataWarning;

/// Result of [`merge`]: entries in deterministic order plus the anomalies
/// resolved along the way.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    pub entries: Vec<MergedItemEntry>,
    pub warnings: Vec<DataWarning>,
}

/// First occurrence of every SKU in tree order, with a position index.
struct Flattened {
    entries: Vec<RawItemEntry>,
    index: HashMap<String, usize>,
}

fn flatten(tree: RawCategoryTree, warnings: &mut Vec<DataWarning>) -> Flattened {
    let locale = tree.locale;
    let mut entries = Vec::new();
    let mut index = HashMap::new();

    for entry in tree.categories.into_iter().flat_map(|c| c.items) {
        if index.contains_key(&entry.sku_id) {
            tracing::warn!(
                locale = %locale,
                sku_id = %entry.sku_id,
                "duplicate sku in locale response; keeping first occurrence"
            );
            warnings.push(DataWarning::DuplicateSku {
                locale: locale.clone(),
                sku_id: entry.sku_id,
            });
            continue;
        }
        index.insert(entry.sku_id.clone(), entries.len());
        entries.push(entry);
    }

    Flattened { entries, index }
}

/// Merges the primary (`a`) and secondary (`b`) locale trees.
///
/// Output order is the primary tree's first-occurrence order, followed by
/// SKUs that only the secondary tree returned, in its order. Identical inputs
/// always produce identical output.
#[must_use]
pub fn merge(
    a: RawCategoryTree,
    locale_a: &Locale,
    b: RawCategoryTree,
    locale_b: &Locale,
) -> MergeOutcome {
    let mut warnings = Vec::new();
    let a = flatten(a, &mut warnings);
    let b = flatten(b, &mut warnings);

    let mut b_slots: Vec<Option<RawItemEntry>> = b.entries.into_iter().map(Some).collect();
    let mut entries = Vec::with_capacity(a.entries.len() + b_slots.len());

    for a_entry in a.entries {
        let b_entry = b
            .index
            .get(&a_entry.sku_id)
            .and_then(|&pos| b_slots[pos].take());

        let mut merged = start_entry(a_entry, locale_a);
        if let Some(b_entry) = b_entry {
            check_invariants(&merged, &b_entry, &mut warnings);
            insert_localized(&mut merged, b_entry.name, b_entry.category, locale_b);
        }
        entries.push(merged);
    }

    entries.extend(
        b_slots
            .into_iter()
            .flatten()
            .map(|b_entry| start_entry(b_entry, locale_b)),
    );

    MergeOutcome { entries, warnings }
}

/// Builds a merged entry whose invariant fields come from `entry`.
fn start_entry(entry: RawItemEntry, locale: &Locale) -> MergedItemEntry {
    let mut merged = MergedItemEntry {
        sku_id: entry.sku_id,
        item_type: entry.item_type,
        names: Default::default(),
        categories: Default::default(),
        price: entry.price,
        parent_sku_id: entry.parent_sku_id,
        preview: entry.preview,
    };
    insert_localized(&mut merged, entry.name, entry.category, locale);
    merged
}

fn insert_localized(
    merged: &mut MergedItemEntry,
    name: Option<String>,
    category: Option<String>,
    locale: &Locale,
) {
    if let Some(name) = name {
        merged.names.insert(locale.tag().to_owned(), name);
    }
    if let Some(category) = category {
        merged.categories.insert(locale.tag().to_owned(), category);
    }
}

fn check_invariants(kept: &MergedItemEntry, other: &RawItemEntry, warnings: &mut Vec<DataWarning>) {
    let mismatched = [
        ("type", kept.item_type != other.item_type),
        ("price", kept.price != other.price),
        ("parent_sku_id", kept.parent_sku_id != other.parent_sku_id),
        ("preview", kept.preview != other.preview),
    ];

    for (field, differs) in mismatched {
        if differs {
            tracing::warn!(
                sku_id = %kept.sku_id,
                field,
                "locale-invariant field differs between locales; keeping primary locale value"
            );
            warnings.push(DataWarning::InvariantMismatch {
                sku_id: kept.sku_id.clone(),
                field,
            });
        }
    }
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod tests;
