use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use ringside_client::{DatasetBuilder, ReqwestFetcher};
use ringside_core::cache::JsonFileCacheStore;
use ringside_core::config::{
    DEFAULT_RANKINGS_URL, DEFAULT_SEARCH_URL, DEFAULT_SITE_BASE_URL, PipelineConfig, SourceConfig,
};
use ringside_core::models::{Bout, Fighter, LastRun};
use ringside_core::reconcile::{check_reciprocity, check_reciprocity_among, reconcile};
use ringside_core::report::TracingReporter;
use ringside_core::retry::RetryPolicy;
use ringside_core::throttle::ThrottleConfig;
use ringside_core::traits::CacheStore;

#[derive(Parser)]
#[command(name = "ringside", version, about = "Rankings and bout history sync")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and write the dataset
    Run {
        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Output folder for fighters.json, bouts.json and last_run.json
        #[arg(short, long, env = "RINGSIDE_OUTPUT_DIR", default_value = "assets/assets/")]
        output: PathBuf,
    },

    /// Fetch and print the current rankings
    Rankings {
        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Resolve one fighter name to a locator through the cache
    Resolve {
        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Fighter name as listed in the rankings
        #[arg(short, long)]
        name: String,
    },

    /// Reconcile a stored bouts file and check reciprocity
    Validate {
        /// Path to a bouts.json file
        #[arg(short, long)]
        bouts: PathBuf,

        /// Path to the matching fighters.json; every listed fighter counts as tracked
        #[arg(short, long)]
        fighters: Option<PathBuf>,
    },
}

#[derive(Args)]
struct PipelineArgs {
    /// Rankings listing page
    #[arg(long, env = "RINGSIDE_RANKINGS_URL", default_value = DEFAULT_RANKINGS_URL)]
    rankings_url: String,

    /// Fighter search endpoint
    #[arg(long, env = "RINGSIDE_SEARCH_URL", default_value = DEFAULT_SEARCH_URL)]
    search_url: String,

    /// Base URL that locators are resolved against
    #[arg(long, env = "RINGSIDE_BASE_URL", default_value = DEFAULT_SITE_BASE_URL)]
    base_url: String,

    /// Name → locator cache file
    #[arg(long, env = "RINGSIDE_CACHE_PATH", default_value = "assets/locator_cache.json")]
    cache: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, env = "RINGSIDE_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Pause after each bout-source request, in milliseconds
    #[arg(long, env = "RINGSIDE_THROTTLE_MS", default_value_t = 1000)]
    throttle_ms: u64,

    /// Stop retrying on 4xx responses (except 408/429)
    #[arg(long, env = "RINGSIDE_FAIL_FAST_4XX", default_value_t = false)]
    fail_fast_4xx: bool,
}

type Builder = DatasetBuilder<ReqwestFetcher, JsonFileCacheStore>;

impl PipelineArgs {
    fn builder(&self) -> Result<Builder> {
        let sources = SourceConfig::new(&self.rankings_url, &self.search_url, &self.base_url)
            .map_err(|e| anyhow::anyhow!(e))?;
        let config = PipelineConfig {
            request_timeout: Duration::from_secs(self.timeout_secs),
            rankings_retry: RetryPolicy::default()
                .with_fail_fast_on_client_error(self.fail_fast_4xx),
            page_retry: RetryPolicy::for_pages().with_fail_fast_on_client_error(self.fail_fast_4xx),
            throttle: ThrottleConfig::new(Duration::from_millis(self.throttle_ms)),
        };
        let fetcher = ReqwestFetcher::with_timeout(config.request_timeout)
            .context("Failed to create HTTP client")?;
        let store = JsonFileCacheStore::new(&self.cache);
        Ok(DatasetBuilder::new(fetcher, store, sources, config))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("ringside=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { pipeline, output } => cmd_run(&pipeline.builder()?, &output).await,
        Commands::Rankings { pipeline } => cmd_rankings(&pipeline.builder()?).await,
        Commands::Resolve { pipeline, name } => cmd_resolve(&pipeline.builder()?, &name).await,
        Commands::Validate { bouts, fighters } => cmd_validate(&bouts, fighters.as_deref()),
    }
}

async fn cmd_run(builder: &Builder, output: &Path) -> Result<()> {
    let dataset = builder
        .build(&TracingReporter)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    let marker = LastRun::for_dataset(&dataset).map_err(|e| anyhow::anyhow!(e))?;

    let marker_path = output.join("last_run.json");
    let previous = read_previous_marker(&marker_path);

    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output folder: {}", output.display()))?;
    write_json(&output.join("fighters.json"), &dataset.fighters)?;
    write_json(&output.join("bouts.json"), &dataset.bouts)?;
    write_json(&marker_path, &marker)?;

    match previous {
        Some(prev) if prev.data_hash == marker.data_hash => {
            tracing::info!(data_hash = %&marker.data_hash[..8], "Dataset unchanged since last run");
        }
        Some(_) => {
            tracing::info!(data_hash = %&marker.data_hash[..8], "Dataset CHANGED since last run");
        }
        None => tracing::info!(data_hash = %&marker.data_hash[..8], "First run, dataset written"),
    }

    println!(
        "Wrote {} fighters and {} bouts to {}",
        marker.fighters,
        marker.bouts,
        output.display()
    );
    Ok(())
}

async fn cmd_rankings(builder: &Builder) -> Result<()> {
    let fighters = builder
        .fetch_rankings(&TracingReporter)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    println!("{}", serde_json::to_string_pretty(&fighters)?);
    Ok(())
}

async fn cmd_resolve(builder: &Builder, name: &str) -> Result<()> {
    let store = builder.store();
    let mut cache = store.load().map_err(|e| anyhow::anyhow!(e))?;

    let resolution = builder
        .resolver()
        .resolve_one(name, &mut cache, &TracingReporter)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    if resolution.live {
        store.save(&cache).map_err(|e| anyhow::anyhow!(e))?;
    }

    let source = if resolution.live { "search" } else { "cache" };
    println!("{name} -> {} ({source})", resolution.locator);
    Ok(())
}

fn cmd_validate(bouts_path: &Path, fighters_path: Option<&Path>) -> Result<()> {
    let bouts: Vec<Bout> = read_json(bouts_path)?;
    let fighters: Option<Vec<Fighter>> = fighters_path.map(read_json::<Vec<Fighter>>).transpose()?;

    let total = bouts.len();
    let reconciled = reconcile(bouts);
    let checked = match &fighters {
        Some(fighters) => check_reciprocity_among(
            &reconciled.bouts,
            fighters.iter().map(|f| f.name.as_str()),
        ),
        None => check_reciprocity(&reconciled.bouts),
    };
    checked.map_err(|e| anyhow::anyhow!(e))?;

    println!(
        "{} bouts OK ({} read, {} stale cancellations suppressed)",
        reconciled.bouts.len(),
        total,
        reconciled.suppressed
    );
    Ok(())
}

/// A missing or unreadable marker counts as no previous run.
fn read_previous_marker(path: &Path) -> Option<LastRun> {
    let raw = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(marker) => Some(marker),
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "Ignoring unreadable run marker");
            None
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_string_pretty(value)?;
    std::fs::write(path, body).with_context(|| format!("Failed to write {}", path.display()))
}
