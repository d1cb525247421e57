pub mod app_config;
pub mod catalog;
pub mod config;
pub mod group;
pub mod locale;
pub mod merge;
pub mod types;
pub mod warning;

#[cfg(test)]
mod test_support;

pub use app_config::AppConfig;
pub use catalog::{build_catalog, Catalog, PreviewAsset, PreviewKind};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use group::{group, GroupOutcome};
pub use locale::{Locale, LocaleError, LocalePair};
pub use merge::{merge, MergeOutcome};
pub use types::{
    Item, ItemType, LocalizedText, MergedItemEntry, Price, PreviewRefs, RawCategory,
    RawCategoryTree, RawItemEntry, Variant,
};
pub use warning::DataWarning;
