//! JSON persistence of the finished catalog.
//!
//! Localized fields are flattened into `name_<tag>` / `category_<tag>` keys
//! using the locale pair's output tags, primary locale first.

use std::path::Path;

use collectibles_core::{Catalog, Item, LocalePair, Variant};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

struct ItemRecord<'a> {
    item: &'a Item,
    tags: [&'a str; 2],
}

struct VariantRecord<'a> {
    variant: &'a Variant,
    tags: [&'a str; 2],
}

fn as_number(amount: Option<Decimal>) -> Option<f64> {
    amount.and_then(|d| d.to_f64())
}

impl Serialize for ItemRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let item = self.item;
        let [a, b] = self.tags;
        let variants = item.variants.as_ref().map(|variants| {
            variants
                .iter()
                .map(|variant| VariantRecord {
                    variant,
                    tags: self.tags,
                })
                .collect::<Vec<_>>()
        });

        let mut map = serializer.serialize_map(Some(14))?;
        map.serialize_entry("sku_id", &item.sku_id)?;
        map.serialize_entry(&format!("name_{a}"), &item.names.get(a))?;
        map.serialize_entry(&format!("name_{b}"), &item.names.get(b))?;
        map.serialize_entry("type", &item.item_type)?;
        map.serialize_entry(&format!("category_{a}"), &item.categories.get(a))?;
        map.serialize_entry(&format!("category_{b}"), &item.categories.get(b))?;
        map.serialize_entry("price", &as_number(item.price.amount))?;
        map.serialize_entry("price_nitro", &as_number(item.price.nitro))?;
        map.serialize_entry("currency", &item.price.currency)?;
        map.serialize_entry("has_variants", &item.has_variants)?;
        map.serialize_entry("variant_count", &item.variant_count)?;
        map.serialize_entry("variants", &variants)?;
        map.serialize_entry("preview_url", &item.preview.static_url)?;
        map.serialize_entry("preview_animated_url", &item.preview.animated_url)?;
        map.end()
    }
}

impl Serialize for VariantRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let variant = self.variant;
        let [a, b] = self.tags;

        let mut map = serializer.serialize_map(Some(5))?;
        map.serialize_entry("sku_id", &variant.sku_id)?;
        map.serialize_entry(&format!("name_{a}"), &variant.names.get(a))?;
        map.serialize_entry(&format!("name_{b}"), &variant.names.get(b))?;
        map.serialize_entry("preview_url", &variant.preview.static_url)?;
        map.serialize_entry("preview_animated_url", &variant.preview.animated_url)?;
        map.end()
    }
}

/// Renders the catalog as a pretty-printed JSON array.
pub(crate) fn catalog_json(catalog: &Catalog, locales: &LocalePair) -> serde_json::Result<Vec<u8>> {
    let tags = locales.tags();
    let records: Vec<ItemRecord<'_>> = catalog
        .items
        .iter()
        .map(|item| ItemRecord { item, tags })
        .collect();
    serde_json::to_vec_pretty(&records)
}

/// Writes the catalog JSON to `path`, creating parent directories as needed.
pub(crate) async fn write_catalog(
    path: &Path,
    catalog: &Catalog,
    locales: &LocalePair,
) -> anyhow::Result<()> {
    let body = catalog_json(catalog, locales)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, body).await?;
    tracing::info!(path = %path.display(), items = catalog.items.len(), "catalog written");
    Ok(())
}
