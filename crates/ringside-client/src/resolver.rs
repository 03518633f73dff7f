//! Name → locator resolution against the bout-history source.
//!
//! The persistent cache is consulted first; only misses trigger a live
//! search. New locators are written back before the resolver returns, even
//! when a later lookup in the same batch fails.

use ringside_core::cache::LocatorCache;
use ringside_core::config::SourceConfig;
use ringside_core::error::AppError;
use ringside_core::models::Fighter;
use ringside_core::report::{PipelineEvent, PipelineReporter};
use ringside_core::traits::{CacheStore, Fetcher};

use crate::search;

/// How a single name was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub locator: String,
    /// True when a live search was issued (cache miss).
    pub live: bool,
}

/// Counts for one batch resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveSummary {
    pub cache_hits: usize,
    pub searched: usize,
}

#[derive(Clone)]
pub struct IdentityResolver<F> {
    fetcher: F,
    sources: SourceConfig,
}

impl<F: Fetcher> IdentityResolver<F> {
    /// `fetcher` should already carry retry and politeness wrapping.
    pub fn new(fetcher: F, sources: SourceConfig) -> Self {
        Self { fetcher, sources }
    }

    /// Live search for `name`; returns the first fighter result's locator.
    pub async fn search(&self, name: &str) -> Result<String, AppError> {
        let url = self.sources.search_url_for(name);
        let html = self.fetcher.fetch(url.as_str()).await?;
        Ok(search::best_match(&html, name)?.locator)
    }

    /// Resolve one name through `cache`, searching and recording on a miss.
    pub async fn resolve_one<R: PipelineReporter>(
        &self,
        name: &str,
        cache: &mut LocatorCache,
        reporter: &R,
    ) -> Result<Resolution, AppError> {
        if let Some(locator) = cache.get(name) {
            reporter.report(PipelineEvent::CacheHit { name, locator });
            return Ok(Resolution {
                locator: locator.to_string(),
                live: false,
            });
        }

        let locator = self.search(name).await?;
        reporter.report(PipelineEvent::LocatorResolved {
            name,
            locator: &locator,
        });
        cache.insert(name, locator.as_str());
        Ok(Resolution {
            locator,
            live: true,
        })
    }

    /// Populate `locator` on every fighter, in order.
    ///
    /// The cache is loaded once from `store` and saved in full if anything
    /// new was resolved, including when a lookup fails partway through.
    pub async fn resolve_all<S: CacheStore, R: PipelineReporter>(
        &self,
        fighters: &mut [Fighter],
        store: &S,
        reporter: &R,
    ) -> Result<ResolveSummary, AppError> {
        let mut cache = store.load()?;
        let mut summary = ResolveSummary::default();
        let mut failure = None;

        for fighter in fighters.iter_mut() {
            match self.resolve_one(&fighter.name, &mut cache, reporter).await {
                Ok(resolution) => {
                    if resolution.live {
                        summary.searched += 1;
                    } else {
                        summary.cache_hits += 1;
                    }
                    fighter.locator = Some(resolution.locator);
                }
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        if summary.searched > 0 {
            let saved = store.save(&cache);
            match (saved, &failure) {
                (Ok(()), _) => reporter.report(PipelineEvent::CacheSaved {
                    entries: cache.len(),
                    new: summary.searched,
                }),
                (Err(e), Some(_)) => {
                    tracing::error!(error = %e, "Failed to save locator cache after resolution error");
                }
                (Err(e), None) => return Err(e),
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(summary),
        }
    }
}
