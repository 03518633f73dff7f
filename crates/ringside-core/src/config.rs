use std::time::Duration;

use url::Url;

use crate::error::AppError;
use crate::retry::RetryPolicy;
use crate::throttle::ThrottleConfig;

pub const DEFAULT_RANKINGS_URL: &str = "https://www.ufc.com/rankings";
pub const DEFAULT_SEARCH_URL: &str = "https://www.tapology.com/search";
pub const DEFAULT_SITE_BASE_URL: &str = "https://www.tapology.com";

/// Where the two external sources live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Rankings listing page.
    pub rankings_url: Url,
    /// Fighter search endpoint on the bout-history source.
    pub search_url: Url,
    /// Base that fighter locators are resolved against.
    pub site_base_url: Url,
}

impl SourceConfig {
    pub fn new(rankings_url: &str, search_url: &str, site_base_url: &str) -> Result<Self, AppError> {
        Ok(Self {
            rankings_url: parse_url("rankings URL", rankings_url)?,
            search_url: parse_url("search URL", search_url)?,
            site_base_url: parse_url("site base URL", site_base_url)?,
        })
    }

    /// Search URL for a fighter name, with the name percent-encoded.
    pub fn search_url_for(&self, name: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("term", name)
            .append_pair("mainSearchFilter", "fighters");
        url
    }

    /// Absolute detail page URL for a locator.
    pub fn detail_url(&self, locator: &str) -> Result<Url, AppError> {
        self.site_base_url
            .join(locator)
            .map_err(|e| AppError::HttpError(format!("Invalid locator '{locator}': {e}")))
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            rankings_url: Url::parse(DEFAULT_RANKINGS_URL).expect("valid default rankings URL"),
            search_url: Url::parse(DEFAULT_SEARCH_URL).expect("valid default search URL"),
            site_base_url: Url::parse(DEFAULT_SITE_BASE_URL).expect("valid default site URL"),
        }
    }
}

fn parse_url(what: &str, raw: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw).map_err(|e| AppError::ConfigError(format!("Invalid {what} '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(AppError::ConfigError(format!(
            "Invalid {what} '{raw}': scheme '{scheme}' is not http/https"
        ))),
    }
}

/// Timing and retry knobs for a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Retry policy for the rankings fetch.
    pub rankings_retry: RetryPolicy,
    /// Retry policy for search and detail page fetches.
    pub page_retry: RetryPolicy,
    /// Pause after each live request to the bout-history source.
    pub throttle: ThrottleConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            rankings_retry: RetryPolicy::default(),
            page_retry: RetryPolicy::for_pages(),
            throttle: ThrottleConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let sources = SourceConfig::default();
        assert_eq!(sources.rankings_url.as_str(), DEFAULT_RANKINGS_URL);

        let config = PipelineConfig::default();
        assert_eq!(config.rankings_retry.max_retries, 5);
        assert_eq!(config.page_retry.max_retries, 15);
        assert_eq!(config.throttle.delay, Duration::from_secs(1));
    }

    #[test]
    fn defaults_pass_validation() {
        let validated =
            SourceConfig::new(DEFAULT_RANKINGS_URL, DEFAULT_SEARCH_URL, DEFAULT_SITE_BASE_URL)
                .unwrap();
        assert_eq!(validated, SourceConfig::default());
    }

    #[test]
    fn rejects_invalid_urls() {
        let err = SourceConfig::new("not a url", DEFAULT_SEARCH_URL, DEFAULT_SITE_BASE_URL)
            .unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));

        let err = SourceConfig::new(DEFAULT_RANKINGS_URL, "ftp://example.com", DEFAULT_SITE_BASE_URL)
            .unwrap_err();
        assert!(err.to_string().contains("not http/https"));
    }

    #[test]
    fn search_url_encodes_name() {
        let sources = SourceConfig::default();
        let url = sources.search_url_for("José Aldo & Co");
        let term = url
            .query_pairs()
            .find(|(k, _)| k == "term")
            .map(|(_, v)| v.into_owned());
        assert_eq!(term.as_deref(), Some("José Aldo & Co"));
        assert!(!url.as_str().contains(' '));
        assert!(url.as_str().contains("mainSearchFilter=fighters"));
    }

    #[test]
    fn detail_url_joins_locator() {
        let sources = SourceConfig::default();
        let url = sources.detail_url("/fightcenter/fighters/1-jon-jones").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.tapology.com/fightcenter/fighters/1-jon-jones"
        );
    }
}
