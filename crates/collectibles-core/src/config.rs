use std::path::PathBuf;

use thiserror::Error;

use crate::app_config::AppConfig;
use crate::locale::{Locale, LocalePair};

pub const DEFAULT_API_BASE_URL: &str = "https://discord.com/api/v9";

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:147.0) Gecko/20100101 Firefox/147.0";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let token = optional("DISCORD_TOKEN");

    let parse_locale = |var: &str, default: &str| -> Result<Locale, ConfigError> {
        Locale::parse(&or_default(var, default)).map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };
    let primary = parse_locale("PRIMARY_LOCALE", "en-US")?;
    let secondary = parse_locale("SECOND_LOCALE", "ru")?;
    let locales = LocalePair::new(primary, secondary).map_err(|e| ConfigError::InvalidEnvVar {
        var: "SECOND_LOCALE".to_string(),
        reason: e.to_string(),
    })?;

    let api_base_url = or_default("COLLECTIBLES_API_BASE_URL", DEFAULT_API_BASE_URL);
    let proxy = optional("PROXY");
    let log_level = or_default("COLLECTIBLES_LOG_LEVEL", "info");
    let output_path = PathBuf::from(or_default(
        "COLLECTIBLES_OUTPUT_PATH",
        "./discord_shop.json",
    ));
    let previews_dir = PathBuf::from(or_default("COLLECTIBLES_PREVIEWS_DIR", "./previews"));

    let request_timeout_secs = parse_u64("COLLECTIBLES_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "COLLECTIBLES_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let user_agent = or_default("COLLECTIBLES_USER_AGENT", DEFAULT_USER_AGENT);
    let max_rate_limit_retries = parse_u32("COLLECTIBLES_MAX_RATE_LIMIT_RETRIES", "5")?;
    let max_transient_retries = parse_u32("COLLECTIBLES_MAX_TRANSIENT_RETRIES", "3")?;
    let transient_retry_delay_ms = parse_u64("COLLECTIBLES_TRANSIENT_RETRY_DELAY_MS", "1000")?;
    let rate_limit_fallback_ms = parse_u64("COLLECTIBLES_RATE_LIMIT_FALLBACK_MS", "1000")?;
    let preview_concurrency = parse_usize("COLLECTIBLES_PREVIEW_CONCURRENCY", "4")?;

    Ok(AppConfig {
        token,
        locales,
        api_base_url,
        proxy,
        log_level,
        output_path,
        previews_dir,
        request_timeout_secs,
        user_agent,
        max_rate_limit_retries,
        max_transient_retries,
        transient_retry_delay_ms,
        rate_limit_fallback_ms,
        preview_concurrency,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
