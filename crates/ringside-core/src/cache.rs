//! Persistent name → locator cache.
//!
//! The cache is read once when resolution starts and rewritten in full
//! after new locators are resolved. A missing file is an empty cache.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::traits::CacheStore;

/// In-memory name → locator map. At most one locator per name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocatorCache {
    entries: BTreeMap<String, String>,
}

impl LocatorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Record a locator, replacing any previous one for `name`.
    pub fn insert(&mut self, name: impl Into<String>, locator: impl Into<String>) {
        self.entries.insert(name.into(), locator.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<N: Into<String>, L: Into<String>> FromIterator<(N, L)> for LocatorCache {
    fn from_iter<I: IntoIterator<Item = (N, L)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(n, l)| (n.into(), l.into()))
                .collect(),
        }
    }
}

/// Cache stored as a pretty-printed JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonFileCacheStore {
    path: PathBuf,
}

impl JsonFileCacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CacheStore for JsonFileCacheStore {
    fn load(&self) -> Result<LocatorCache, AppError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No locator cache yet, starting empty");
                return Ok(LocatorCache::new());
            }
            Err(e) => {
                return Err(AppError::CacheError(format!(
                    "Failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };
        let cache: LocatorCache = serde_json::from_str(&raw)?;
        tracing::debug!(path = %self.path.display(), entries = cache.len(), "Loaded locator cache");
        Ok(cache)
    }

    fn save(&self, cache: &LocatorCache) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::CacheError(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }

        // Write beside the target, then rename over it.
        let tmp = self.path.with_extension("json.tmp");
        let body = serde_json::to_string_pretty(cache)?;
        fs::write(&tmp, body)
            .map_err(|e| AppError::CacheError(format!("Failed to write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            AppError::CacheError(format!("Failed to replace {}: {e}", self.path.display()))
        })?;

        tracing::debug!(path = %self.path.display(), entries = cache.len(), "Saved locator cache");
        Ok(())
    }
}
