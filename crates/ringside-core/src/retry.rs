//! Retry with pure exponential backoff.
//!
//! [`retry_with_backoff`] knows nothing about payloads: it reruns an
//! operation while its error is retryable, doubling the delay after every
//! failed attempt (no jitter, no cap). [`RetryingFetcher`] applies it to any
//! [`Fetcher`].

use std::future::Future;
use std::time::Duration;

use crate::error::AppError;
use crate::traits::Fetcher;

/// Retry budget and backoff schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero behaves like one.
    pub max_retries: u32,

    /// Delay after the first failed attempt; doubled after each subsequent one.
    pub initial_delay: Duration,

    /// Give up immediately on 4xx responses other than 408/429.
    pub fail_fast_on_client_error: bool,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Policy used for listing and detail page fetches.
    pub fn for_pages() -> Self {
        Self::new(15)
    }

    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    pub fn with_fail_fast_on_client_error(mut self, fail_fast: bool) -> Self {
        self.fail_fast_on_client_error = fail_fast;
        self
    }

    fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Delay slept after failed attempt `attempt` (1-indexed).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_delay.saturating_mul(factor)
    }

    /// The full sleep schedule for an operation that never succeeds.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (1..self.attempts()).map(|attempt| self.delay_after(attempt))
    }

    fn should_retry(&self, error: &AppError) -> bool {
        if !error.is_retryable() {
            return false;
        }
        !(self.fail_fast_on_client_error && error.is_permanent_client_error())
    }
}

impl Default for RetryPolicy {
    /// 5 attempts starting at 1 second.
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_secs(1),
            fail_fast_on_client_error: false,
        }
    }
}

/// A failed attempt that is about to be retried.
#[derive(Debug, Clone)]
pub struct FetchAttempt<'a> {
    pub url: &'a str,
    pub attempt_number: u32,
    pub delay_before_retry: Duration,
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// policy's attempt budget is spent.
///
/// Exhaustion yields [`AppError::FetchExhausted`] wrapping the last cause.
pub async fn retry_with_backoff<T, Op, Fut>(
    policy: &RetryPolicy,
    url: &str,
    mut op: Op,
) -> Result<T, AppError>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let attempts = policy.attempts();
    let mut attempt_number = 1;

    loop {
        let error = match op().await {
            Ok(value) => {
                if attempt_number > 1 {
                    tracing::debug!(%url, attempt_number, "Fetch recovered after retry");
                }
                return Ok(value);
            }
            Err(e) if !policy.should_retry(&e) => return Err(e),
            Err(e) => e,
        };

        if attempt_number >= attempts {
            tracing::error!(%url, attempts, error = %error, "Retry budget exhausted");
            return Err(AppError::FetchExhausted {
                url: url.to_string(),
                attempts,
                source: Box::new(error),
            });
        }

        let attempt = FetchAttempt {
            url,
            attempt_number,
            delay_before_retry: policy.delay_after(attempt_number),
        };
        tracing::warn!(
            url = %attempt.url,
            attempt = attempt.attempt_number,
            of = attempts,
            delay_ms = %attempt.delay_before_retry.as_millis(),
            error = %error,
            "Fetch failed, backing off"
        );
        tokio::time::sleep(attempt.delay_before_retry).await;
        attempt_number += 1;
    }
}

/// A [`Fetcher`] wrapper that retries transient failures with backoff.
#[derive(Clone)]
pub struct RetryingFetcher<F> {
    inner: F,
    policy: RetryPolicy,
}

impl<F: Fetcher> RetryingFetcher<F> {
    pub fn new(inner: F, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

impl<F: Fetcher> Fetcher for RetryingFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        let inner = &self.inner;
        retry_with_backoff(&self.policy, url, move || inner.fetch(url)).await
    }
}
