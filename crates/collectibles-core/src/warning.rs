//! Non-fatal data-consistency anomalies found while merging and grouping.

/// An upstream inconsistency that was resolved by a deterministic fallback
/// rule rather than failing the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataWarning {
    /// The same SKU appeared more than once in one locale's tree; the first
    /// occurrence was kept.
    DuplicateSku { locale: String, sku_id: String },

    /// Both locales returned the SKU but a locale-invariant field differed;
    /// the primary locale's value was kept.
    InvariantMismatch { sku_id: String, field: &'static str },

    /// A variant referenced a parent that is not a top-level item; the
    /// variant was promoted to a standalone item.
    DanglingParent {
        sku_id: String,
        parent_sku_id: String,
    },
}

impl std::fmt::Display for DataWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateSku { locale, sku_id } => {
                write!(f, "duplicate sku {sku_id} in {locale} response")
            }
            Self::InvariantMismatch { sku_id, field } => {
                write!(f, "sku {sku_id}: {field} differs between locales")
            }
            Self::DanglingParent {
                sku_id,
                parent_sku_id,
            } => write!(
                f,
                "sku {sku_id} references missing parent {parent_sku_id}"
            ),
        }
    }
}
