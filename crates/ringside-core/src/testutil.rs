//! Test utilities: mock implementations of the core traits.
//!
//! Handwritten mocks for dependency injection in unit and integration tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing test
//! assertions on recorded calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::cache::LocatorCache;
use crate::error::AppError;
use crate::traits::{CacheStore, Fetcher};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Mock fetcher that serves routed pages or a queue of responses.
///
/// Lookup order per call: exact URL route, then the response queue, then a
/// default HTML string. Every requested URL is recorded.
#[derive(Clone, Default)]
pub struct MockFetcher {
    routes: Arc<Mutex<HashMap<String, String>>>,
    /// Each call pops the first element.
    responses: Arc<Mutex<Vec<Result<String, AppError>>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new(html: &str) -> Self {
        Self::with_responses(vec![Ok(html.to_string())])
    }

    pub fn with_error(error: AppError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<String, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            ..Self::default()
        }
    }

    /// Serve `html` whenever `url` is requested.
    pub fn route(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.routes.lock().unwrap().insert(url.into(), html.into());
        self
    }

    /// All URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// How many times `url` was requested.
    pub fn count_for(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.as_str() == url)
            .count()
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.requests.lock().unwrap().push(url.to_string());

        if let Some(html) = self.routes.lock().unwrap().get(url) {
            return Ok(html.clone());
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("<html><body>default</body></html>".to_string())
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryCacheStore
// ---------------------------------------------------------------------------

/// In-memory cache store that records every save.
#[derive(Clone, Default)]
pub struct MemoryCacheStore {
    current: Arc<Mutex<LocatorCache>>,
    saves: Arc<Mutex<Vec<LocatorCache>>>,
    save_error: Arc<Mutex<Option<AppError>>>,
}

impl MemoryCacheStore {
    /// Empty store, as on a first run.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `cache`, as on a later run.
    pub fn with_cache(cache: LocatorCache) -> Self {
        Self {
            current: Arc::new(Mutex::new(cache)),
            ..Self::default()
        }
    }

    /// Store whose next save fails with `error`.
    pub fn with_save_error(error: AppError) -> Self {
        Self {
            save_error: Arc::new(Mutex::new(Some(error))),
            ..Self::default()
        }
    }

    pub fn current(&self) -> LocatorCache {
        self.current.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().unwrap().len()
    }
}

impl CacheStore for MemoryCacheStore {
    fn load(&self) -> Result<LocatorCache, AppError> {
        Ok(self.current.lock().unwrap().clone())
    }

    fn save(&self, cache: &LocatorCache) -> Result<(), AppError> {
        if let Some(e) = self.save_error.lock().unwrap().take() {
            return Err(e);
        }
        self.saves.lock().unwrap().push(cache.clone());
        *self.current.lock().unwrap() = cache.clone();
        Ok(())
    }
}
