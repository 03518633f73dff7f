use std::future::Future;

use crate::cache::LocatorCache;
use crate::error::AppError;

/// Fetches a raw document from a URL.
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Durable storage for the name → locator cache.
///
/// `load` on missing storage yields an empty cache; `save` replaces the
/// stored cache in full.
pub trait CacheStore: Send + Sync {
    fn load(&self) -> Result<LocatorCache, AppError>;

    fn save(&self, cache: &LocatorCache) -> Result<(), AppError>;
}
