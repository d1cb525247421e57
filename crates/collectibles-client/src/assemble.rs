use collectibles_core::{build_catalog, Catalog, LocalePair};

use crate::error::FetchError;
use crate::loader::CategorySource;

/// Loads both locales concurrently and builds the merged, grouped catalog.
///
/// # Errors
///
/// Returns the first [`FetchError`] from either locale; no partial catalog
/// is produced.
pub async fn assemble_catalog<S: CategorySource>(
    source: &S,
    locales: &LocalePair,
) -> Result<Catalog, FetchError> {
    tracing::info!(
        primary = %locales.primary,
        secondary = %locales.secondary,
        "loading category trees"
    );

    let (primary, secondary) = tokio::try_join!(
        source.load(&locales.primary),
        source.load(&locales.secondary)
    )?;

    let catalog = build_catalog(primary, secondary, locales);
    for warning in &catalog.warnings {
        tracing::debug!(%warning, "catalog data warning");
    }
    tracing::info!(
        items = catalog.items.len(),
        warnings = catalog.warnings.len(),
        "catalog assembled"
    );
    Ok(catalog)
}
