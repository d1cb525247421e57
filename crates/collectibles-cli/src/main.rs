mod output;
mod previews;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use collectibles_client::{assemble_catalog, CancelToken, ClientOptions, CommerceClient};
use collectibles_core::{AppConfig, Catalog, ConfigError, Locale, LocalePair};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "collectibles-cli")]
#[command(about = "Fetch the collectibles shop catalog in two locales")]
struct Cli {
    /// Secondary locale code (overrides SECOND_LOCALE)
    #[arg(short, long)]
    locale: Option<String>,

    /// Skip downloading preview images
    #[arg(long)]
    no_previews: bool,

    /// Catalog JSON output path (overrides COLLECTIBLES_OUTPUT_PATH)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Preview download directory (overrides COLLECTIBLES_PREVIEWS_DIR)
    #[arg(long)]
    previews_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = collectibles_core::load_app_config()?;
    apply_overrides(&mut config, &cli)?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let token = match config.token.clone() {
        Some(token) => token,
        None => prompt_token()?,
    };

    let (cancel_handle, cancel) = CancelToken::pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received; cancelling outstanding requests");
            cancel_handle.cancel();
        }
    });

    let client = CommerceClient::new(&token, &ClientOptions::from_app_config(&config))?
        .with_cancel_token(cancel);

    let catalog = assemble_catalog(&client, &config.locales).await?;
    output::write_catalog(&config.output_path, &catalog, &config.locales).await?;

    let preview_summary = if cli.no_previews {
        None
    } else {
        Some(
            previews::download_previews(
                &client,
                &catalog.distinct_previews(),
                &config.previews_dir,
                config.preview_concurrency,
            )
            .await?,
        )
    };

    print_summary(&config, &catalog, preview_summary.as_ref());
    Ok(())
}

/// Folds command-line flags over the environment configuration.
fn apply_overrides(config: &mut AppConfig, cli: &Cli) -> anyhow::Result<()> {
    if let Some(code) = cli.locale.as_deref() {
        config.locales = LocalePair::new(config.locales.primary.clone(), Locale::parse(code)?)?;
    }
    if let Some(path) = &cli.output {
        config.output_path.clone_from(path);
    }
    if let Some(dir) = &cli.previews_dir {
        config.previews_dir.clone_from(dir);
    }
    Ok(())
}

fn prompt_token() -> anyhow::Result<String> {
    let mut stderr = std::io::stderr();
    write!(stderr, "Discord token: ")?;
    stderr.flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let token = line.trim().to_owned();
    if token.is_empty() {
        return Err(ConfigError::MissingEnvVar("DISCORD_TOKEN".to_owned()).into());
    }
    Ok(token)
}

fn print_summary(
    config: &AppConfig,
    catalog: &Catalog,
    previews: Option<&previews::PreviewSummary>,
) {
    println!(
        "wrote {} items to {}",
        catalog.items.len(),
        config.output_path.display()
    );
    for (item_type, count) in catalog.type_counts() {
        println!("  {item_type:<20}{count}");
    }
    let variants: usize = catalog.items.iter().map(|i| i.variant_count).sum();
    println!("  {:<20}{variants}", "variants");

    if let Some(summary) = previews {
        println!(
            "previews: {} downloaded, {} failed ({})",
            summary.downloaded,
            summary.failed,
            config.previews_dir.display()
        );
    }
    if !catalog.warnings.is_empty() {
        eprintln!(
            "warning: {} data inconsistencies resolved (see log)",
            catalog.warnings.len()
        );
    }
}
