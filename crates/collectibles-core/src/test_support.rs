//! Fixture builders shared by the unit tests.

use rust_decimal::Decimal;

use crate::types::{
    ItemType, MergedItemEntry, Price, PreviewRefs, RawCategory, RawCategoryTree, RawItemEntry,
};

pub(crate) fn raw(sku_id: &str, name: &str) -> RawItemEntry {
    RawItemEntry {
        sku_id: sku_id.to_owned(),
        item_type: ItemType::AvatarDecoration,
        name: Some(name.to_owned()),
        category: Some("Shop".to_owned()),
        price: Price {
            amount: Some(Decimal::new(499, 2)),
            nitro: Some(Decimal::new(399, 2)),
            currency: Some("usd".to_owned()),
        },
        parent_sku_id: None,
        preview: PreviewRefs {
            static_url: Some(format!("https://cdn.example.com/{sku_id}.png")),
            animated_url: None,
        },
    }
}

pub(crate) fn child(sku_id: &str, name: &str, parent: &str) -> RawItemEntry {
    RawItemEntry {
        parent_sku_id: Some(parent.to_owned()),
        ..raw(sku_id, name)
    }
}

pub(crate) fn tree(locale: &str, categories: Vec<Vec<RawItemEntry>>) -> RawCategoryTree {
    RawCategoryTree {
        locale: locale.to_owned(),
        categories: categories
            .into_iter()
            .map(|items| RawCategory {
                name: Some("Shop".to_owned()),
                items,
            })
            .collect(),
    }
}

pub(crate) fn merged(sku_id: &str, parent: Option<&str>) -> MergedItemEntry {
    let entry = raw(sku_id, &format!("Item {sku_id}"));
    MergedItemEntry {
        sku_id: entry.sku_id,
        item_type: entry.item_type,
        names: [("en".to_owned(), entry.name.unwrap_or_default())]
            .into_iter()
            .collect(),
        categories: Default::default(),
        price: entry.price,
        parent_sku_id: parent.map(str::to_owned),
        preview: entry.preview,
    }
}
