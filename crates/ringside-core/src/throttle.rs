//! Fixed politeness pause for requests against rate-sensitive sources.
//!
//! Wraps any [`Fetcher`] so that every live fetch is followed by a fixed
//! pause before control returns to the caller. Requests never overlap, so
//! the pause bounds the request rate against the source.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use ringside_core::throttle::{ThrottledFetcher, ThrottleConfig};
//!
//! # use ringside_core::traits::Fetcher;
//! # #[derive(Clone)] struct MyFetcher;
//! # impl Fetcher for MyFetcher {
//! #     async fn fetch(&self, _: &str) -> Result<String, ringside_core::error::AppError> { todo!() }
//! # }
//! let fetcher = ThrottledFetcher::new(MyFetcher, ThrottleConfig::new(Duration::from_secs(1)));
//! ```

use std::time::Duration;

use crate::error::AppError;
use crate::traits::Fetcher;

/// Configuration for the throttled fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottleConfig {
    /// Pause after each request, whether it succeeded or not.
    pub delay: Duration,
}

impl ThrottleConfig {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// No pause at all.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl Default for ThrottleConfig {
    /// 1 second after every request.
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

/// A [`Fetcher`] wrapper that pauses after every request.
#[derive(Clone)]
pub struct ThrottledFetcher<F> {
    inner: F,
    config: ThrottleConfig,
}

impl<F: Fetcher> ThrottledFetcher<F> {
    pub fn new(inner: F, config: ThrottleConfig) -> Self {
        Self { inner, config }
    }

    async fn pause(&self, url: &str) {
        if self.config.delay.is_zero() {
            return;
        }
        tracing::debug!(
            %url,
            sleep_ms = %self.config.delay.as_millis(),
            "Politeness pause"
        );
        tokio::time::sleep(self.config.delay).await;
    }
}

impl<F: Fetcher> Fetcher for ThrottledFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        let result = self.inner.fetch(url).await;
        self.pause(url).await;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockFetcher;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn pauses_after_each_request() {
        let inner = MockFetcher::new("<html>ok</html>");
        let fetcher = ThrottledFetcher::new(inner, ThrottleConfig::new(Duration::from_secs(1)));

        let start = Instant::now();
        fetcher.fetch("http://example.com/page1").await.unwrap();
        fetcher.fetch("http://example.com/page2").await.unwrap();
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_secs(2), "elapsed: {elapsed:?}");
        assert!(elapsed < Duration::from_millis(2100), "elapsed: {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn pauses_after_failures_too() {
        let inner = MockFetcher::with_error(AppError::Timeout(10));
        let fetcher = ThrottledFetcher::new(inner, ThrottleConfig::default());

        let start = Instant::now();
        let err = fetcher.fetch("http://example.com").await.unwrap_err();
        assert!(matches!(err, AppError::Timeout(10)));
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn disabled_throttle_passes_through() {
        let inner = MockFetcher::new("<html>hello</html>");
        let fetcher = ThrottledFetcher::new(inner, ThrottleConfig::disabled());

        let result = fetcher.fetch("http://example.com").await.unwrap();
        assert_eq!(result, "<html>hello</html>");
    }

    #[test]
    fn default_config_is_one_second() {
        assert_eq!(ThrottleConfig::default().delay, Duration::from_secs(1));
    }
}
