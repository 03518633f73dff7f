/// Events emitted by the pipeline for monitoring/logging.
#[derive(Debug, Clone)]
pub enum PipelineEvent<'a> {
    RankingsParsed {
        fighters: usize,
        divisions: usize,
    },
    DuplicateFighterSkipped {
        name: &'a str,
        division: &'a str,
    },
    CacheHit {
        name: &'a str,
        locator: &'a str,
    },
    LocatorResolved {
        name: &'a str,
        locator: &'a str,
    },
    CacheSaved {
        entries: usize,
        new: usize,
    },
    BoutsExtracted {
        name: &'a str,
        bouts: usize,
        skipped_rows: usize,
    },
    Reconciled {
        raw: usize,
        kept: usize,
        suppressed: usize,
    },
    ReciprocityVerified {
        bouts: usize,
    },
}

/// Trait for receiving pipeline events (decoupled logging).
pub trait PipelineReporter: Send + Sync {
    fn report(&self, event: PipelineEvent<'_>) {
        let _ = event;
    }
}

/// Reporter that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl PipelineReporter for SilentReporter {}

/// Reporter that uses the `tracing` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl PipelineReporter for TracingReporter {
    fn report(&self, event: PipelineEvent<'_>) {
        match event {
            PipelineEvent::RankingsParsed {
                fighters,
                divisions,
            } => {
                tracing::info!(%fighters, %divisions, "Rankings parsed");
            }
            PipelineEvent::DuplicateFighterSkipped { name, division } => {
                tracing::warn!(%name, %division, "Fighter already ranked in another division, skipping");
            }
            PipelineEvent::CacheHit { name, locator } => {
                tracing::debug!(%name, %locator, "Locator cache hit");
            }
            PipelineEvent::LocatorResolved { name, locator } => {
                tracing::info!(%name, %locator, "Locator resolved by search");
            }
            PipelineEvent::CacheSaved { entries, new } => {
                tracing::info!(%entries, %new, "Locator cache saved");
            }
            PipelineEvent::BoutsExtracted {
                name,
                bouts,
                skipped_rows,
            } => {
                tracing::info!(%name, %bouts, %skipped_rows, "Bouts extracted");
            }
            PipelineEvent::Reconciled {
                raw,
                kept,
                suppressed,
            } => {
                tracing::info!(%raw, %kept, %suppressed, "Bouts reconciled");
            }
            PipelineEvent::ReciprocityVerified { bouts } => {
                tracing::info!(%bouts, "Reciprocity verified");
            }
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use recording::RecordingReporter;

#[cfg(any(test, feature = "test-utils"))]
mod recording {
    use std::sync::{Arc, Mutex};

    use super::{PipelineEvent, PipelineReporter};

    /// Reporter that keeps a debug rendering of every event.
    #[derive(Debug, Default, Clone)]
    pub struct RecordingReporter {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingReporter {
        pub fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }

        pub fn count_matching(&self, prefix: &str) -> usize {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.starts_with(prefix))
                .count()
        }
    }

    impl PipelineReporter for RecordingReporter {
        fn report(&self, event: PipelineEvent<'_>) {
            self.events.lock().unwrap().push(format!("{event:?}"));
        }
    }
}
