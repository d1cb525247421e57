//! Bounded-concurrency download of preview images to disk.

use std::path::Path;

use collectibles_client::{CommerceClient, FetchErrorKind};
use collectibles_core::PreviewAsset;
use futures::stream::{self, StreamExt};

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct PreviewSummary {
    pub downloaded: usize,
    pub failed: usize,
}

enum DownloadOutcome {
    Saved,
    Failed,
    Cancelled,
}

/// Downloads every asset into `dir`, overwriting existing files.
///
/// Individual failures are logged and counted. Returns an error only when the
/// directory cannot be created or the run was cancelled.
pub(crate) async fn download_previews(
    client: &CommerceClient,
    assets: &[PreviewAsset],
    dir: &Path,
    concurrency: usize,
) -> anyhow::Result<PreviewSummary> {
    if assets.is_empty() {
        tracing::info!("no previews to download");
        return Ok(PreviewSummary::default());
    }
    tokio::fs::create_dir_all(dir).await?;
    tracing::info!(count = assets.len(), dir = %dir.display(), "downloading previews");

    let outcomes = stream::iter(assets.iter().map(|asset| async move {
        let target = dir.join(asset.file_name());
        let bytes = match client.fetch_asset(&asset.url).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == FetchErrorKind::Cancelled => return DownloadOutcome::Cancelled,
            Err(e) => {
                tracing::warn!(
                    sku_id = %asset.owner_sku_id,
                    url = %asset.url,
                    error = %e,
                    "preview download failed"
                );
                return DownloadOutcome::Failed;
            }
        };
        match tokio::fs::write(&target, bytes).await {
            Ok(()) => DownloadOutcome::Saved,
            Err(e) => {
                tracing::warn!(
                    sku_id = %asset.owner_sku_id,
                    path = %target.display(),
                    error = %e,
                    "preview write failed"
                );
                DownloadOutcome::Failed
            }
        }
    }))
    .buffer_unordered(concurrency.max(1))
    .collect::<Vec<_>>()
    .await;

    let mut summary = PreviewSummary::default();
    let mut cancelled = false;
    for outcome in outcomes {
        match outcome {
            DownloadOutcome::Saved => summary.downloaded += 1,
            DownloadOutcome::Failed => summary.failed += 1,
            DownloadOutcome::Cancelled => cancelled = true,
        }
    }
    if cancelled {
        anyhow::bail!(
            "preview download cancelled after {} of {} files",
            summary.downloaded,
            assets.len()
        );
    }

    tracing::info!(
        downloaded = summary.downloaded,
        failed = summary.failed,
        "preview download finished"
    );
    Ok(summary)
}
