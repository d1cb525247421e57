//! Upstream response types for `GET /collectibles-categories/v2`.
//!
//! ## Observed shape
//!
//! ### Items vs. variants
//! With `variants_return_style=2` a product lists its purchasable entries in
//! `items[]`. Products sold in several colors instead leave `items[]` empty
//! and list one entry per color under `variants[]`, each with its own `name`
//! and `items[]`.
//!
//! ### Prices
//! `prices` is keyed by price tier as a string: `"0"` is the regular price,
//! `"4"` the subscriber price. Each tier holds integer `amount`s with an
//! `exponent` (minor-unit digits, usually 2). The list mixes real currencies
//! with `discord_orb`, an in-app virtual currency.
//!
//! ### Previews
//! Avatar decorations and nameplates expose `assets.static_image_url` /
//! `assets.animated_image_url`; avatar decorations may only have an `asset`
//! hash. Profile effects expose camelCase `thumbnailPreviewSrc` /
//! `reducedMotionSrc` and an `effects[]` list of layers.
//!
//! Only `categories` is required; everything below it defaults so that one
//! odd product does not reject a whole locale.

use std::collections::HashMap;

use serde::Deserialize;

/// Top-level response.
#[derive(Debug, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<WireCategory>,
}

#[derive(Debug, Deserialize)]
pub struct WireCategory {
    /// Localized category name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub products: Vec<WireProduct>,
}

#[derive(Debug, Deserialize)]
pub struct WireProduct {
    #[serde(default)]
    pub sku_id: Option<String>,
    /// Localized product name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub prices: HashMap<String, WirePriceTier>,
    #[serde(default)]
    pub items: Vec<WireItem>,
    #[serde(default)]
    pub variants: Vec<WireVariant>,
}

#[derive(Debug, Deserialize)]
pub struct WireVariant {
    /// Localized color/style name, e.g. `"Oni Mask (Blue)"`.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub items: Vec<WireItem>,
}

#[derive(Debug, Deserialize)]
pub struct WirePriceTier {
    #[serde(default)]
    pub country_prices: Option<WireCountryPrices>,
}

#[derive(Debug, Deserialize)]
pub struct WireCountryPrices {
    #[serde(default)]
    pub prices: Vec<WirePrice>,
}

#[derive(Debug, Deserialize)]
pub struct WirePrice {
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default = "default_exponent")]
    pub exponent: u32,
}

fn default_exponent() -> u32 {
    2
}

#[derive(Debug, Deserialize)]
pub struct WireItem {
    #[serde(default)]
    pub sku_id: Option<String>,
    #[serde(rename = "type", default)]
    pub item_type: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    /// Asset hash for avatar decorations.
    #[serde(default)]
    pub asset: Option<String>,
    #[serde(default)]
    pub assets: Option<WireAssets>,
    #[serde(rename = "thumbnailPreviewSrc", default)]
    pub thumbnail_preview_src: Option<String>,
    #[serde(rename = "reducedMotionSrc", default)]
    pub reduced_motion_src: Option<String>,
    #[serde(default)]
    pub effects: Vec<WireEffect>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireAssets {
    #[serde(default)]
    pub static_image_url: Option<String>,
    #[serde(default)]
    pub animated_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireEffect {
    #[serde(default)]
    pub src: Option<String>,
}
