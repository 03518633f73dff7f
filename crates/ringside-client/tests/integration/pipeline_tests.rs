use std::time::Duration;

use chrono::NaiveDate;
use ringside_client::DatasetBuilder;
use ringside_core::cache::JsonFileCacheStore;
use ringside_core::config::SourceConfig;
use ringside_core::error::AppError;
use ringside_core::models::{Bout, BoutResult};
use ringside_core::report::{RecordingReporter, SilentReporter};
use ringside_core::testutil::MemoryCacheStore;
use ringside_core::throttle::ThrottleConfig;
use ringside_core::traits::CacheStore;

use crate::common::{self, LOC_A, LOC_B, LOC_C};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn full_run_builds_reconciled_dataset() -> anyhow::Result<()> {
    common::init_tracing();
    let sources = SourceConfig::default();
    let fetcher = common::world(&sources);
    let store = MemoryCacheStore::empty();
    let reporter = RecordingReporter::default();
    let builder = DatasetBuilder::new(
        fetcher.clone(),
        store.clone(),
        sources,
        common::config(ThrottleConfig::disabled()),
    );

    let dataset = builder.build(&reporter).await?;

    let names: Vec<_> = dataset.fighters.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Bravo", "Charlie"]);
    assert!(dataset.fighters[0].is_champion());
    assert_eq!(dataset.fighters[1].rank_movement, 2);
    assert_eq!(dataset.fighters[2].rank_movement, -1);
    assert_eq!(dataset.fighters[2].locator.as_deref(), Some(LOC_C));

    assert_eq!(
        dataset.bouts,
        vec![
            Bout::new("Alpha", "Bravo", BoutResult::Win, date(2025, 10, 25)),
            Bout::new("Alpha", "Charlie", BoutResult::Win, date(2024, 3, 1)),
            Bout::new("Bravo", "Charlie", BoutResult::Scheduled, date(2026, 12, 12)),
            Bout::new("Bravo", "Alpha", BoutResult::Loss, date(2025, 10, 25)),
            Bout::new("Charlie", "Bravo", BoutResult::Scheduled, date(2026, 12, 12)),
            Bout::new("Charlie", "Alpha", BoutResult::Loss, date(2024, 3, 1)),
        ]
    );
    assert!(dataset.bouts.iter().all(|b| !b.result.is_cancelled()));

    // rankings + 3 searches + 3 detail pages
    assert_eq!(fetcher.request_count(), 7);
    assert_eq!(store.current().len(), 3);
    assert_eq!(reporter.count_matching("Reconciled"), 1);
    assert_eq!(reporter.count_matching("ReciprocityVerified"), 1);
    Ok(())
}

#[tokio::test]
async fn warm_cache_skips_search() -> anyhow::Result<()> {
    let sources = SourceConfig::default();
    let store = MemoryCacheStore::with_cache(
        [("Alpha", LOC_A), ("Bravo", LOC_B), ("Charlie", LOC_C)]
            .into_iter()
            .collect(),
    );
    let fetcher = common::world(&sources);
    let builder = DatasetBuilder::new(
        fetcher.clone(),
        store.clone(),
        sources.clone(),
        common::config(ThrottleConfig::disabled()),
    );

    let dataset = builder.build(&SilentReporter).await?;

    assert_eq!(dataset.bouts.len(), 6);
    assert_eq!(fetcher.count_for(&common::search_url(&sources, "Alpha")), 0);
    assert_eq!(fetcher.request_count(), 4);
    assert_eq!(store.save_count(), 0);
    Ok(())
}

#[tokio::test]
async fn runs_are_deterministic() -> anyhow::Result<()> {
    let sources = SourceConfig::default();
    let config = common::config(ThrottleConfig::disabled());
    let store = MemoryCacheStore::empty();

    let first = DatasetBuilder::new(common::world(&sources), store.clone(), sources.clone(), config.clone())
        .build(&SilentReporter)
        .await?;
    let second = DatasetBuilder::new(common::world(&sources), store, sources, config)
        .build(&SilentReporter)
        .await?;

    assert_eq!(first, second);
    assert_eq!(first.data_hash()?, second.data_hash()?);
    Ok(())
}

#[tokio::test]
async fn one_sided_record_fails_reciprocity() {
    let sources = SourceConfig::default();
    let bravo = common::detail_page(&[common::bout_row(LOC_C, None, "2026", "Dec 12")]);
    let fetcher =
        common::world_with_pages(&sources, common::page_alpha(), bravo, common::page_charlie());
    let builder = DatasetBuilder::new(
        fetcher,
        MemoryCacheStore::empty(),
        sources,
        common::config(ThrottleConfig::disabled()),
    );

    match builder.build(&SilentReporter).await {
        Err(AppError::ReciprocityViolation { principal, opponent }) => {
            assert_eq!(principal, "Alpha");
            assert_eq!(opponent, "Bravo");
        }
        other => panic!("expected ReciprocityViolation, got {other:?}"),
    }
}

#[tokio::test]
async fn misresolved_locator_is_detected() {
    let sources = SourceConfig::default();
    let unrelated = common::detail_page(&[common::bout_row(
        "/fightcenter/fighters/500-stranger",
        Some("W"),
        "2020",
        "Feb 02",
    )]);
    let fetcher =
        common::world_with_pages(&sources, common::page_alpha(), unrelated, common::page_charlie());
    let builder = DatasetBuilder::new(
        fetcher,
        MemoryCacheStore::empty(),
        sources,
        common::config(ThrottleConfig::disabled()),
    );

    match builder.build(&SilentReporter).await {
        Err(AppError::NoTrackedOpponentsFound { name, locator }) => {
            assert_eq!(name, "Bravo");
            assert_eq!(locator, LOC_B);
        }
        other => panic!("expected NoTrackedOpponentsFound, got {other:?}"),
    }
}

#[tokio::test]
async fn two_names_on_one_page_abort_the_run() {
    let sources = SourceConfig::default();
    let fetcher = common::world(&sources)
        .route(common::search_url(&sources, "Bravo"), common::search_results(LOC_A));
    let builder = DatasetBuilder::new(
        fetcher,
        MemoryCacheStore::empty(),
        sources,
        common::config(ThrottleConfig::disabled()),
    );

    match builder.build(&SilentReporter).await {
        Err(AppError::DuplicateLocator {
            locator,
            first,
            second,
        }) => {
            assert_eq!(locator, LOC_A);
            assert_eq!(first, "Alpha");
            assert_eq!(second, "Bravo");
        }
        other => panic!("expected DuplicateLocator, got {other:?}"),
    }
}

#[tokio::test]
async fn locator_cache_file_is_written() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("cache").join("locators.json");
    let sources = SourceConfig::default();
    let builder = DatasetBuilder::new(
        common::world(&sources),
        JsonFileCacheStore::new(&path),
        sources,
        common::config(ThrottleConfig::disabled()),
    );

    builder.build(&SilentReporter).await?;

    assert!(path.exists());
    let cache = builder.store().load()?;
    assert_eq!(cache.get("Bravo"), Some(LOC_B));
    assert_eq!(cache.len(), 3);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn bout_source_requests_are_paced() -> anyhow::Result<()> {
    let sources = SourceConfig::default();
    let config = common::config(ThrottleConfig::new(Duration::from_secs(1)));
    let store = MemoryCacheStore::empty();

    let start = tokio::time::Instant::now();
    DatasetBuilder::new(common::world(&sources), store.clone(), sources.clone(), config.clone())
        .build(&SilentReporter)
        .await?;
    // 3 searches + 3 detail pages; the rankings fetch is not paced
    assert!(start.elapsed() >= Duration::from_secs(6));
    assert!(start.elapsed() < Duration::from_secs(7));

    let start = tokio::time::Instant::now();
    DatasetBuilder::new(common::world(&sources), store, sources, config)
        .build(&SilentReporter)
        .await?;
    assert!(start.elapsed() >= Duration::from_secs(3));
    assert!(start.elapsed() < Duration::from_secs(4));
    Ok(())
}
