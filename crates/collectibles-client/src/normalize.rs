//! Normalization from the upstream wire shape to [`RawCategoryTree`].
//!
//! Products are unpacked into flat item entries. Color variants are linked to
//! their base item through `parent_sku_id`: within one product, the first
//! item of each type is the base and later items of the same type point at
//! it. Bundles mix types, so their items stay independent.

use std::collections::HashMap;

use collectibles_core::{
    ItemType, Price, PreviewRefs, RawCategory, RawCategoryTree, RawItemEntry,
};
use rust_decimal::Decimal;

use crate::wire::{CategoriesResponse, WireCategory, WireItem, WirePriceTier, WireProduct};

const REGULAR_PRICE_TIER: &str = "0";
const NITRO_PRICE_TIER: &str = "4";
const VIRTUAL_CURRENCY: &str = "discord_orb";
const AVATAR_DECORATION_CDN: &str = "https://cdn.discordapp.com/avatar-decoration-presets";

/// Converts one locale's response into a [`RawCategoryTree`].
#[must_use]
pub fn normalize_categories(response: CategoriesResponse, locale: &str) -> RawCategoryTree {
    RawCategoryTree {
        locale: locale.to_owned(),
        categories: response
            .categories
            .into_iter()
            .map(normalize_category)
            .collect(),
    }
}

fn normalize_category(category: WireCategory) -> RawCategory {
    let name = category.name;
    let items = category
        .products
        .into_iter()
        .flat_map(|product| normalize_product(product, name.as_deref()))
        .collect();
    RawCategory { name, items }
}

fn normalize_product(product: WireProduct, category: Option<&str>) -> Vec<RawItemEntry> {
    let price = extract_price(&product.prices);

    // Standalone products keep their items under variants[] instead of items[].
    let named_items: Vec<(Option<String>, WireItem)> = if product.items.is_empty() {
        product
            .variants
            .into_iter()
            .flat_map(|variant| {
                let name = variant.name;
                variant
                    .items
                    .into_iter()
                    .map(move |item| (name.clone(), item))
            })
            .collect()
    } else {
        product.items.into_iter().map(|item| (None, item)).collect()
    };

    if named_items.is_empty() {
        tracing::debug!(
            product_sku_id = product.sku_id.as_deref().unwrap_or("<none>"),
            "product has no items"
        );
    }

    let mut base_by_type: HashMap<ItemType, String> = HashMap::new();
    let mut entries = Vec::with_capacity(named_items.len());

    for (variant_name, item) in named_items {
        let Some(sku_id) = item.sku_id.clone().filter(|s| !s.is_empty()) else {
            continue;
        };
        let item_type = item.item_type.map_or(ItemType::Unspecified, ItemType::from_code);

        let parent_sku_id = match base_by_type.get(&item_type) {
            Some(base) if *base != sku_id => Some(base.clone()),
            Some(_) => None,
            None => {
                base_by_type.insert(item_type, sku_id.clone());
                None
            }
        };

        let name = variant_name
            .filter(|n| !n.is_empty())
            .or_else(|| item.title.clone().filter(|t| !t.is_empty()))
            .or_else(|| product.name.clone());

        entries.push(RawItemEntry {
            preview: extract_preview(&item, item_type),
            sku_id,
            item_type,
            name,
            category: category.map(str::to_owned),
            price: price.clone(),
            parent_sku_id,
        });
    }

    entries
}

/// Extracts the regular and subscriber prices, skipping virtual currency.
/// The currency is fixed by the first real entry seen; each tier then takes
/// its first amount in that currency, so both amounts share the label.
fn extract_price(prices: &HashMap<String, WirePriceTier>) -> Price {
    let mut price = Price::default();

    for (tier, slot) in [
        (REGULAR_PRICE_TIER, &mut price.amount),
        (NITRO_PRICE_TIER, &mut price.nitro),
    ] {
        let Some(entries) = prices
            .get(tier)
            .and_then(|t| t.country_prices.as_ref())
            .map(|c| &c.prices)
        else {
            continue;
        };

        for entry in entries {
            let currency = entry.currency.as_deref().unwrap_or_default();
            if currency == VIRTUAL_CURRENCY {
                continue;
            }
            if price
                .currency
                .as_deref()
                .is_some_and(|chosen| chosen != currency)
            {
                continue;
            }
            match Decimal::try_new(entry.amount, entry.exponent) {
                Ok(amount) => {
                    *slot = Some(amount);
                    if price.currency.is_none() && !currency.is_empty() {
                        price.currency = Some(currency.to_owned());
                    }
                    break;
                }
                Err(e) => {
                    tracing::warn!(
                        tier,
                        amount = entry.amount,
                        exponent = entry.exponent,
                        error = %e,
                        "unrepresentable price; skipping"
                    );
                }
            }
        }
    }

    price
}

fn extract_preview(item: &WireItem, item_type: ItemType) -> PreviewRefs {
    let assets = item.assets.as_ref();
    let static_asset = || assets.and_then(|a| a.static_image_url.clone());
    let animated_asset = || assets.and_then(|a| a.animated_image_url.clone());

    match item_type {
        ItemType::AvatarDecoration => PreviewRefs {
            static_url: static_asset().or_else(|| {
                item.asset
                    .as_deref()
                    .filter(|a| !a.is_empty())
                    .map(|a| format!("{AVATAR_DECORATION_CDN}/{a}.png"))
            }),
            animated_url: animated_asset(),
        },
        ItemType::ProfileEffect => PreviewRefs {
            static_url: item
                .thumbnail_preview_src
                .clone()
                .or_else(|| item.reduced_motion_src.clone())
                .or_else(|| item.effects.first().and_then(|e| e.src.clone())),
            animated_url: None,
        },
        ItemType::Nameplate => PreviewRefs {
            static_url: static_asset(),
            animated_url: animated_asset(),
        },
        ItemType::Other(_) | ItemType::Unspecified => PreviewRefs::default(),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
