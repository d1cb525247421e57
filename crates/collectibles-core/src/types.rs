//! Catalog record types, from the per-locale raw tree to the final [`Item`].
//!
//! Localized strings are held as [`LocalizedText`], a map from locale tag to
//! text. The `name_<tag>` field names only exist at serialization time.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

/// Locale tag → localized text.
pub type LocalizedText = BTreeMap<String, String>;

/// Kind of purchasable collectible, decoded from the upstream numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemType {
    AvatarDecoration,
    ProfileEffect,
    Nameplate,
    /// A code this crate does not know about yet.
    Other(i64),
    /// The upstream entry carried no type at all.
    Unspecified,
}

impl ItemType {
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::AvatarDecoration,
            1 => Self::ProfileEffect,
            2 => Self::Nameplate,
            other => Self::Other(other),
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AvatarDecoration => f.write_str("AVATAR_DECORATION"),
            Self::ProfileEffect => f.write_str("PROFILE_EFFECT"),
            Self::Nameplate => f.write_str("NAMEPLATE"),
            Self::Other(code) => write!(f, "TYPE_{code}"),
            Self::Unspecified => f.write_str("TYPE_UNSPECIFIED"),
        }
    }
}

impl serde::Serialize for ItemType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Regular and discounted price in major currency units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Price {
    pub amount: Option<Decimal>,
    /// Discounted price for subscribers.
    pub nitro: Option<Decimal>,
    /// ISO currency code as reported upstream for the caller's account.
    pub currency: Option<String>,
}

/// Static and animated preview asset URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewRefs {
    pub static_url: Option<String>,
    pub animated_url: Option<String>,
}

/// One item as returned for a single locale.
#[derive(Debug, Clone, PartialEq)]
pub struct RawItemEntry {
    pub sku_id: String,
    pub item_type: ItemType,
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Price,
    /// The base item this entry is a color variant of.
    pub parent_sku_id: Option<String>,
    pub preview: PreviewRefs,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawCategory {
    pub name: Option<String>,
    pub items: Vec<RawItemEntry>,
}

/// The as-received category tree for one locale.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCategoryTree {
    pub locale: String,
    pub categories: Vec<RawCategory>,
}

impl RawCategoryTree {
    /// Items in category order, then item order within each category.
    pub fn entries(&self) -> impl Iterator<Item = &RawItemEntry> {
        self.categories.iter().flat_map(|c| c.items.iter())
    }
}

/// Both locales' view of one SKU.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedItemEntry {
    pub sku_id: String,
    pub item_type: ItemType,
    pub names: LocalizedText,
    pub categories: LocalizedText,
    pub price: Price,
    pub parent_sku_id: Option<String>,
    pub preview: PreviewRefs,
}

/// A color/style alternative nested under its parent [`Item`]. Price and type
/// are inherited from the parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub sku_id: String,
    pub names: LocalizedText,
    pub preview: PreviewRefs,
}

/// Final catalog record.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub sku_id: String,
    pub item_type: ItemType,
    pub names: LocalizedText,
    pub categories: LocalizedText,
    pub price: Price,
    pub has_variants: bool,
    pub variant_count: usize,
    /// `None` for standalone items.
    pub variants: Option<Vec<Variant>>,
    pub preview: PreviewRefs,
}
