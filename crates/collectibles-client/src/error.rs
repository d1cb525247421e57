use std::time::Duration;

use thiserror::Error;

/// Errors returned by [`crate::CommerceClient`] and the catalog assembly.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP 401/403: the token is invalid or expired. Never retried.
    #[error("unauthorized (HTTP {status}) from {url}")]
    Unauthorized { status: u16, url: String },

    /// HTTP 429 kept coming back after every allowed retry.
    #[error("rate limited by {url} after {retries} retries (last retry-after {last_retry_after:?})")]
    RateLimitExhausted {
        url: String,
        retries: u32,
        last_retry_after: Duration,
    },

    /// HTTP 5xx or a transport failure persisted through the retry budget.
    #[error("upstream unavailable at {url} after {retries} retries: {reason}")]
    Unavailable {
        url: String,
        retries: u32,
        reason: String,
    },

    /// The response body did not match the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    MalformedResponse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Aborted through a [`crate::CancelToken`].
    #[error("request cancelled")]
    Cancelled,

    /// Any other non-2xx status. Not retried.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The underlying `reqwest::Client` could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("token contains characters not allowed in an HTTP header")]
    InvalidToken,
}

/// Coarse classification of a [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Unauthorized,
    RateLimitExhausted,
    Unavailable,
    MalformedResponse,
    Cancelled,
    UnexpectedStatus,
    Configuration,
}

impl FetchError {
    #[must_use]
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Unauthorized { .. } => FetchErrorKind::Unauthorized,
            Self::RateLimitExhausted { .. } => FetchErrorKind::RateLimitExhausted,
            Self::Unavailable { .. } => FetchErrorKind::Unavailable,
            Self::MalformedResponse { .. } => FetchErrorKind::MalformedResponse,
            Self::Cancelled => FetchErrorKind::Cancelled,
            Self::UnexpectedStatus { .. } => FetchErrorKind::UnexpectedStatus,
            Self::Client(_) | Self::InvalidBaseUrl { .. } | Self::InvalidToken => {
                FetchErrorKind::Configuration
            }
        }
    }
}
