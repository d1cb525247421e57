//! The finished catalog and the views external sinks consume.

use std::collections::{BTreeMap, HashSet};

use crate::group::group;
use crate::locale::LocalePair;
use crate::merge::merge;
use crate::types::{Item, PreviewRefs, RawCategoryTree};
use crate::warning::DataWarning;

#[derive(Debug, Default)]
pub struct Catalog {
    pub items: Vec<Item>,
    /// Anomalies resolved during merging and grouping, in the order found.
    pub warnings: Vec<DataWarning>,
}

/// Merges both locale trees and groups the result into a [`Catalog`].
#[must_use]
pub fn build_catalog(
    primary: RawCategoryTree,
    secondary: RawCategoryTree,
    locales: &LocalePair,
) -> Catalog {
    let merged = merge(primary, &locales.primary, secondary, &locales.secondary);
    let grouped = group(merged.entries);

    let mut warnings = merged.warnings;
    warnings.extend(grouped.warnings);

    Catalog {
        items: grouped.items,
        warnings,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    Static,
    Animated,
}

/// One preview URL to retrieve, attributed to the first record that
/// referenced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewAsset {
    pub owner_sku_id: String,
    pub kind: PreviewKind,
    pub url: String,
}

impl PreviewAsset {
    /// File name for the downloaded asset: `<sku>.<ext>` for static previews,
    /// `<sku>_animated.<ext>` for animated ones.
    #[must_use]
    pub fn file_name(&self) -> String {
        let path = self.url.split(['?', '#']).next().unwrap_or_default();
        let ext = if path.contains(".gif") {
            "gif"
        } else if path.contains(".webp") {
            "webp"
        } else {
            "png"
        };
        match self.kind {
            PreviewKind::Static => format!("{}.{ext}", self.owner_sku_id),
            PreviewKind::Animated => format!("{}_animated.{ext}", self.owner_sku_id),
        }
    }
}

impl Catalog {
    /// Every distinct preview URL across items and their variants, in
    /// catalog order. A URL shared by several records is listed once.
    #[must_use]
    pub fn distinct_previews(&self) -> Vec<PreviewAsset> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut assets = Vec::new();

        let records = self.items.iter().flat_map(|item| {
            std::iter::once((item.sku_id.as_str(), &item.preview)).chain(
                item.variants
                    .iter()
                    .flatten()
                    .map(|v| (v.sku_id.as_str(), &v.preview)),
            )
        });

        for (sku_id, preview) in records {
            for (kind, url) in preview_urls(preview) {
                if seen.insert(url) {
                    assets.push(PreviewAsset {
                        owner_sku_id: sku_id.to_owned(),
                        kind,
                        url: url.to_owned(),
                    });
                }
            }
        }

        assets
    }

    /// Top-level item count per type name, sorted by name.
    #[must_use]
    pub fn type_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for item in &self.items {
            *counts.entry(item.item_type.to_string()).or_insert(0) += 1;
        }
        counts
    }
}

fn preview_urls(preview: &PreviewRefs) -> impl Iterator<Item = (PreviewKind, &str)> {
    [
        (PreviewKind::Static, preview.static_url.as_deref()),
        (PreviewKind::Animated, preview.animated_url.as_deref()),
    ]
    .into_iter()
    .filter_map(|(kind, url)| url.filter(|u| !u.is_empty()).map(|u| (kind, u)))
}
