use thiserror::Error;

/// Application-wide error types for ringside.
#[derive(Error, Debug)]
pub enum AppError {
    /// Transport-level HTTP failure (request could not be completed).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Retry budget exhausted on a network operation.
    #[error("Fetch of {url} failed after {attempts} attempts: {source}")]
    FetchExhausted {
        url: String,
        attempts: u32,
        #[source]
        source: Box<AppError>,
    },

    /// A required structural element of a listing page is missing.
    #[error("Malformed page: {0}")]
    MalformedPage(String),

    /// A bout row is missing its result badge or date fragments.
    #[error("Malformed bout row: {0}")]
    MalformedBoutRow(String),

    /// Identity search returned no fighter rows.
    #[error("No search results for '{name}'")]
    NoSearchResults { name: String },

    /// A detail page listed no bout against any tracked fighter.
    #[error("No tracked opponents found for '{name}' at {locator} (locator likely mis-resolved)")]
    NoTrackedOpponentsFound { name: String, locator: String },

    /// A bout is recorded from only one side of a tracked pair.
    #[error("Reciprocity violation: {principal} vs {opponent} has no reverse record")]
    ReciprocityViolation { principal: String, opponent: String },

    /// Two ranked fighters resolved to the same detail page.
    #[error("'{first}' and '{second}' both resolved to {locator}")]
    DuplicateLocator {
        locator: String,
        first: String,
        second: String,
    },

    /// A fighter reached bout extraction without a resolved locator.
    #[error("Fighter '{0}' has no resolved locator")]
    MissingLocator(String),

    /// Reading or writing the locator cache failed.
    #[error("Cache error: {0}")]
    CacheError(String),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl AppError {
    /// Returns true if this error is a transient network fault worth retrying.
    ///
    /// Non-success statuses count as transient: upstream flakiness shows up as
    /// both 4xx and 5xx on these sources.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::HttpError(_)
                | AppError::HttpStatus { .. }
                | AppError::Timeout(_)
                | AppError::NetworkError(_)
        )
    }

    /// Returns true for a 4xx response that will not change on retry.
    ///
    /// 408 (request timeout) and 429 (too many requests) are excluded.
    pub fn is_permanent_client_error(&self) -> bool {
        match self {
            AppError::HttpStatus { status, .. } => {
                (400..500).contains(status) && *status != 408 && *status != 429
            }
            _ => false,
        }
    }
}
