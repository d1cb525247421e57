//! HTTP client for the private collectibles commerce endpoint.
//!
//! Wraps `reqwest` with the upstream's authorization and locale headers, the
//! rate-limit contract from [`crate::retry`], and caller cancellation. No
//! other part of the workspace talks to the network.

mod options;

use std::sync::Arc;
use std::time::Duration;

use collectibles_core::RawCategoryTree;
use reqwest::header::{HeaderValue, AUTHORIZATION, RETRY_AFTER};
use reqwest::{Client, StatusCode, Url};

use crate::cancel::CancelToken;
use crate::error::FetchError;
use crate::normalize::normalize_categories;
use crate::retry::{retry_after_from, run_with_retry, AttemptError, RetryPolicy, Sleeper, TokioSleeper};
use crate::wire::CategoriesResponse;

pub use options::ClientOptions;

/// Header carrying the locale the response strings are rendered in.
pub const LOCALE_HEADER: &str = "X-Discord-Locale";

const CATEGORIES_PATH: &str = "collectibles-categories/v2";

const CATEGORIES_QUERY: [(&str, &str); 3] = [
    ("include_bundles", "true"),
    ("variants_return_style", "2"),
    ("skip_num_categories", "0"),
];

/// Client for the collectibles catalog.
///
/// Use [`CommerceClient::new`] with [`ClientOptions::default`] for production
/// or point `base_url` at a mock server in tests.
pub struct CommerceClient {
    client: Client,
    base_url: Url,
    auth_header: HeaderValue,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    cancel: CancelToken,
}

impl CommerceClient {
    /// Creates a client with the given credential and options.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Client`] if the `reqwest::Client` cannot be built
    ///   (e.g. an unparseable proxy URL).
    /// - [`FetchError::InvalidBaseUrl`] if `options.base_url` is not a URL.
    /// - [`FetchError::InvalidToken`] if the token is not a valid header value.
    pub fn new(token: &str, options: &ClientOptions) -> Result<Self, FetchError> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(options.user_agent.as_str());
        if let Some(proxy_url) = &options.proxy_url {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }
        let client = builder.build()?;

        let invalid_base = |reason: String| FetchError::InvalidBaseUrl {
            base_url: options.base_url.clone(),
            reason,
        };
        let base_url = Url::parse(options.base_url.trim_end_matches('/'))
            .map_err(|e| invalid_base(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid_base("URL cannot carry a path".to_owned()));
        }

        let mut auth_header =
            HeaderValue::from_str(token.trim()).map_err(|_| FetchError::InvalidToken)?;
        auth_header.set_sensitive(true);

        Ok(Self {
            client,
            base_url,
            auth_header,
            retry: options.retry.clone(),
            sleeper: Arc::new(TokioSleeper),
            cancel: CancelToken::never(),
        })
    }

    /// Replaces the delay implementation used between retries.
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Aborts in-flight requests and retry waits once `cancel` fires.
    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Fetches the full category tree rendered in `locale`.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Unauthorized`] on HTTP 401/403 (not retried).
    /// - [`FetchError::RateLimitExhausted`] if HTTP 429 persists past the
    ///   rate-limit retry budget.
    /// - [`FetchError::Unavailable`] if 5xx or transport failures persist
    ///   past the transient retry budget.
    /// - [`FetchError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`FetchError::MalformedResponse`] if the body is not the expected
    ///   JSON shape (not retried).
    /// - [`FetchError::Cancelled`] if the cancel token fires first.
    pub async fn fetch_categories(&self, locale: &str) -> Result<RawCategoryTree, FetchError> {
        let url = self.categories_url();
        tracing::debug!(%url, locale, "fetching collectible categories");

        let body = self.get_with_retry(&url, Some(locale), true).await?;
        let response = serde_json::from_slice::<CategoriesResponse>(&body).map_err(|e| {
            FetchError::MalformedResponse {
                context: format!("collectible categories for locale {locale}"),
                source: e,
            }
        })?;

        let tree = normalize_categories(response, locale);
        tracing::info!(
            locale,
            categories = tree.categories.len(),
            items = tree.entries().count(),
            "fetched collectible categories"
        );
        Ok(tree)
    }

    /// Downloads a preview asset under the same retry and cancellation rules.
    /// The authorization header is not sent.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_categories`], minus `MalformedResponse`; an
    /// unparseable `url` yields [`FetchError::InvalidBaseUrl`].
    pub async fn fetch_asset(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidBaseUrl {
            base_url: url.to_owned(),
            reason: e.to_string(),
        })?;
        self.get_with_retry(&parsed, None, false).await
    }

    /// Builds the categories URL with its fixed query parameters.
    fn categories_url(&self) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects URLs that cannot be a base, so this always applies.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(CATEGORIES_PATH.split('/'));
        }
        url.query_pairs_mut().extend_pairs(CATEGORIES_QUERY);
        url
    }

    async fn get_with_retry(
        &self,
        url: &Url,
        locale: Option<&str>,
        authorized: bool,
    ) -> Result<Vec<u8>, FetchError> {
        let url_str = url.as_str();
        self.cancel
            .guard(run_with_retry(
                url_str,
                &self.retry,
                self.sleeper.as_ref(),
                || self.attempt(url, locale, authorized),
            ))
            .await
    }

    /// Sends one GET and classifies the outcome for the retry loop.
    async fn attempt(
        &self,
        url: &Url,
        locale: Option<&str>,
        authorized: bool,
    ) -> Result<Vec<u8>, AttemptError> {
        let mut request = self.client.get(url.clone());
        if authorized {
            request = request.header(AUTHORIZATION, self.auth_header.clone());
        }
        if let Some(locale) = locale {
            request = request.header(LOCALE_HEADER, locale);
        }

        let response = request.send().await.map_err(classify_transport_error)?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let header = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let body = response.text().await.unwrap_or_default();
            let retry_after = retry_after_from(header.as_deref(), &body).unwrap_or_else(|| {
                tracing::debug!(%url, "429 without usable retry-after; using fallback delay");
                self.retry.rate_limit_fallback
            });
            return Err(AttemptError::RateLimited { retry_after });
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AttemptError::Fatal(FetchError::Unauthorized {
                status: status.as_u16(),
                url: url.to_string(),
            }));
        }

        if status.is_server_error() {
            return Err(AttemptError::Transient {
                reason: format!("HTTP {status}"),
            });
        }

        if !status.is_success() {
            return Err(AttemptError::Fatal(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            }));
        }

        let body = response.bytes().await.map_err(classify_transport_error)?;
        Ok(body.to_vec())
    }
}

/// Request-construction errors can never succeed on retry; everything else
/// reqwest reports (connect, timeout, reset, body) is transient.
fn classify_transport_error(err: reqwest::Error) -> AttemptError {
    if err.is_builder() {
        AttemptError::Fatal(FetchError::Client(err))
    } else {
        AttemptError::Transient {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
