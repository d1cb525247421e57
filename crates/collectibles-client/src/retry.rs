//! Retry loop for the commerce client.
//!
//! HTTP 429 is retried after exactly the server-specified delay, up to
//! `max_rate_limit_retries` times. Transport failures and 5xx responses are
//! retried a small fixed number of times after a fixed delay. Everything else
//! (401/403, other 4xx, malformed bodies) is returned immediately.
//!
//! Delays go through a [`Sleeper`] so tests can observe them without waiting.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;
use serde::Deserialize;

use crate::error::FetchError;

/// Suspends the calling task for a given duration.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

/// Production [`Sleeper`] backed by `tokio::time::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// [`Sleeper`] that returns immediately and records every requested delay.
#[derive(Debug, Default, Clone)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays requested so far, in order.
    #[must_use]
    pub fn delays(&self) -> Vec<Duration> {
        self.delays
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        if let Ok(mut delays) = self.delays.lock() {
            delays.push(duration);
        }
        Box::pin(std::future::ready(()))
    }
}

/// Retry budget and delays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after HTTP 429 before giving up.
    pub max_rate_limit_retries: u32,
    /// Retries allowed after 5xx or transport failures.
    pub max_transient_retries: u32,
    /// Fixed wait before a transient retry.
    pub transient_delay: Duration,
    /// Wait used when a 429 carries no usable retry-after.
    pub rate_limit_fallback: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_rate_limit_retries: 5,
            max_transient_retries: 3,
            transient_delay: Duration::from_secs(1),
            rate_limit_fallback: Duration::from_secs(1),
        }
    }
}

/// Outcome of a single failed attempt.
#[derive(Debug)]
pub(crate) enum AttemptError {
    RateLimited { retry_after: Duration },
    Transient { reason: String },
    Fatal(FetchError),
}

/// Runs `operation` until it succeeds, fails fatally, or exhausts the
/// policy's budget for its failure class. The two budgets are independent.
pub(crate) async fn run_with_retry<T, F, Fut>(
    url: &str,
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AttemptError>>,
{
    let mut rate_limit_retries = 0u32;
    let mut transient_retries = 0u32;

    loop {
        let delay = match operation().await {
            Ok(value) => return Ok(value),
            Err(AttemptError::Fatal(err)) => return Err(err),
            Err(AttemptError::RateLimited { retry_after }) => {
                if rate_limit_retries >= policy.max_rate_limit_retries {
                    return Err(FetchError::RateLimitExhausted {
                        url: url.to_owned(),
                        retries: rate_limit_retries,
                        last_retry_after: retry_after,
                    });
                }
                rate_limit_retries += 1;
                tracing::warn!(
                    url,
                    attempt = rate_limit_retries,
                    max_retries = policy.max_rate_limit_retries,
                    delay_ms = u64::try_from(retry_after.as_millis()).unwrap_or(u64::MAX),
                    "rate limited; waiting server-specified delay"
                );
                retry_after
            }
            Err(AttemptError::Transient { reason }) => {
                if transient_retries >= policy.max_transient_retries {
                    return Err(FetchError::Unavailable {
                        url: url.to_owned(),
                        retries: transient_retries,
                        reason,
                    });
                }
                transient_retries += 1;
                tracing::warn!(
                    url,
                    attempt = transient_retries,
                    max_retries = policy.max_transient_retries,
                    error = %reason,
                    "transient upstream error; retrying after fixed delay"
                );
                policy.transient_delay
            }
        };

        sleeper.sleep(delay).await;
    }
}

#[derive(Deserialize)]
struct RateLimitBody {
    #[serde(default)]
    retry_after: Option<f64>,
}

/// Reads the retry-after delay from a 429 response: the `Retry-After` header
/// first, then the JSON body's `retry_after` field. Both are seconds and may
/// be fractional. Returns `None` when neither yields a non-negative number.
pub(crate) fn retry_after_from(header: Option<&str>, body: &str) -> Option<Duration> {
    header
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .and_then(secs_to_duration)
        .or_else(|| {
            serde_json::from_str::<RateLimitBody>(body)
                .ok()
                .and_then(|b| b.retry_after)
                .and_then(secs_to_duration)
        })
}

fn secs_to_duration(secs: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(secs).ok()
}
