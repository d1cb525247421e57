use std::path::PathBuf;

use crate::locale::LocalePair;

#[derive(Clone)]
pub struct AppConfig {
    pub token: Option<String>,
    pub locales: LocalePair,
    pub api_base_url: String,
    pub proxy: Option<String>,
    pub log_level: String,
    pub output_path: PathBuf,
    pub previews_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_rate_limit_retries: u32,
    pub max_transient_retries: u32,
    pub transient_retry_delay_ms: u64,
    pub rate_limit_fallback_ms: u64,
    pub preview_concurrency: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .field("locales", &self.locales)
            .field("api_base_url", &self.api_base_url)
            .field("proxy", &self.proxy.as_ref().map(|_| "[redacted]"))
            .field("log_level", &self.log_level)
            .field("output_path", &self.output_path)
            .field("previews_dir", &self.previews_dir)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_rate_limit_retries", &self.max_rate_limit_retries)
            .field("max_transient_retries", &self.max_transient_retries)
            .field("transient_retry_delay_ms", &self.transient_retry_delay_ms)
            .field("rate_limit_fallback_ms", &self.rate_limit_fallback_ms)
            .field("preview_concurrency", &self.preview_concurrency)
            .finish()
    }
}

impl AppConfig {
    /// The configured proxy as a `socks5://` URL.
    ///
    /// Accepts `host:port` or `host:port@user:pass`; a value that already
    /// carries a scheme is passed through unchanged.
    #[must_use]
    pub fn proxy_url(&self) -> Option<String> {
        let raw = self.proxy.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        if raw.contains("://") {
            return Some(raw.to_owned());
        }
        match raw.split_once('@') {
            Some((host_port, auth)) => Some(format!("socks5://{auth}@{host_port}")),
            None => Some(format!("socks5://{raw}")),
        }
    }
}
