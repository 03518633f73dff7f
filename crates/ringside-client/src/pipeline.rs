use ringside_core::config::{PipelineConfig, SourceConfig};
use ringside_core::error::AppError;
use ringside_core::models::{Dataset, Fighter, Roster};
use ringside_core::reconcile::{check_reciprocity_among, reconcile};
use ringside_core::report::{PipelineEvent, PipelineReporter};
use ringside_core::retry::RetryingFetcher;
use ringside_core::throttle::ThrottledFetcher;
use ringside_core::traits::{CacheStore, Fetcher};

use crate::bouts::BoutExtractor;
use crate::rankings;
use crate::resolver::IdentityResolver;

/// Fetcher stack used for the bout-history source: retry inside, politeness outside.
pub type PageFetcher<F> = ThrottledFetcher<RetryingFetcher<F>>;

/// Runs the full forward pipeline: rankings → resolution → bout extraction →
/// reconciliation → reciprocity check.
///
/// Generic over the transport and the cache store, so the whole pipeline can
/// run against fixtures. Every step is sequential; the first hard failure
/// aborts the build.
pub struct DatasetBuilder<F, S>
where
    F: Fetcher,
    S: CacheStore,
{
    fetcher: F,
    store: S,
    sources: SourceConfig,
    config: PipelineConfig,
}

impl<F, S> DatasetBuilder<F, S>
where
    F: Fetcher,
    S: CacheStore,
{
    pub fn new(fetcher: F, store: S, sources: SourceConfig, config: PipelineConfig) -> Self {
        Self {
            fetcher,
            store,
            sources,
            config,
        }
    }

    fn page_fetcher(&self) -> PageFetcher<F> {
        ThrottledFetcher::new(
            RetryingFetcher::new(self.fetcher.clone(), self.config.page_retry.clone()),
            self.config.throttle.clone(),
        )
    }

    pub fn resolver(&self) -> IdentityResolver<PageFetcher<F>> {
        IdentityResolver::new(self.page_fetcher(), self.sources.clone())
    }

    pub fn extractor(&self) -> BoutExtractor<PageFetcher<F>> {
        BoutExtractor::new(self.page_fetcher(), self.sources.clone())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch and parse the rankings listing. Names are unique in the result.
    pub async fn fetch_rankings<R: PipelineReporter>(
        &self,
        reporter: &R,
    ) -> Result<Vec<Fighter>, AppError> {
        let fetcher =
            RetryingFetcher::new(self.fetcher.clone(), self.config.rankings_retry.clone());
        let url = self.sources.rankings_url.as_str();
        tracing::info!("Fetching rankings from {}", url);
        let html = fetcher.fetch(url).await?;

        let (fighters, duplicates) = rankings::dedupe_by_name(rankings::parse_rankings(&html)?);
        for dup in &duplicates {
            reporter.report(PipelineEvent::DuplicateFighterSkipped {
                name: &dup.name,
                division: &dup.division,
            });
        }

        let mut divisions: Vec<&str> = fighters.iter().map(|f| f.division.as_str()).collect();
        divisions.dedup();
        reporter.report(PipelineEvent::RankingsParsed {
            fighters: fighters.len(),
            divisions: divisions.len(),
        });
        Ok(fighters)
    }

    /// Build the full dataset.
    pub async fn build<R: PipelineReporter>(&self, reporter: &R) -> Result<Dataset, AppError> {
        // 1. Rankings
        let mut fighters = self.fetch_rankings(reporter).await?;

        // 2. Identity resolution
        let summary = self
            .resolver()
            .resolve_all(&mut fighters, &self.store, reporter)
            .await?;
        tracing::info!(
            cache_hits = summary.cache_hits,
            searched = summary.searched,
            "Locators resolved"
        );

        // 3. Bout extraction, one fighter at a time
        let roster = Roster::from_fighters(&fighters)?;
        let extractor = self.extractor();
        let mut raw = Vec::new();
        for fighter in &fighters {
            let page = extractor.extract(fighter, &roster).await?;
            reporter.report(PipelineEvent::BoutsExtracted {
                name: &fighter.name,
                bouts: page.bouts.len(),
                skipped_rows: page.skipped_rows,
            });
            raw.extend(page.bouts);
        }

        // 4. Reconciliation
        let raw_count = raw.len();
        let reconciled = reconcile(raw);
        reporter.report(PipelineEvent::Reconciled {
            raw: raw_count,
            kept: reconciled.bouts.len(),
            suppressed: reconciled.suppressed,
        });

        // 5. Reciprocity
        let tracked = fighters.iter().map(|f| f.name.as_str());
        check_reciprocity_among(&reconciled.bouts, tracked)?;
        reporter.report(PipelineEvent::ReciprocityVerified {
            bouts: reconciled.bouts.len(),
        });

        Ok(Dataset {
            fighters,
            bouts: reconciled.bouts,
        })
    }
}
