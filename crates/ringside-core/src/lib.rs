pub mod cache;
pub mod config;
pub mod dates;
pub mod error;
pub mod models;
pub mod reconcile;
pub mod report;
pub mod retry;
pub mod throttle;
pub mod traits;
pub mod util;

#[cfg(any(test, feature = "test-utils"))]
pub mod testutil;

pub use cache::{JsonFileCacheStore, LocatorCache};
pub use config::{PipelineConfig, SourceConfig};
pub use error::AppError;
pub use models::{Bout, BoutResult, Dataset, Fighter, LastRun, Roster, compute_hash};
pub use reconcile::{Reconciled, check_reciprocity, check_reciprocity_among, reconcile};
pub use report::{PipelineEvent, PipelineReporter, SilentReporter, TracingReporter};
pub use retry::{RetryPolicy, RetryingFetcher, retry_with_backoff};
pub use throttle::{ThrottleConfig, ThrottledFetcher};
pub use traits::{CacheStore, Fetcher};
