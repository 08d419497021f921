//! Periodic source-localization orchestrator
//!
//! Once per period the orchestrator reads the acquisition stream's current
//! sample, localizes every source with the engine and installs the complete
//! result as the new [`SourceSnapshot`]. The renderer only ever reads whole
//! snapshots through [`Published`], so it never waits on the solver and
//! never sees a list that mixes two cycles.
//!
//! Scheduling follows `tokio::time::interval` with
//! [`MissedTickBehavior::Delay`]: a cycle that overruns the period is
//! followed immediately by the next one, and missed cycles are dropped
//! rather than queued.

use brainviz_core::{
    AcquisitionStream, LocalizationEngine, Published, Sample, SourceEstimate, SourceSnapshot,
};
use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Time between the starts of consecutive localization cycles
    pub period: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(5),
        }
    }
}

/// Counters describing the orchestrator's progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrchestratorStats {
    /// Completed cycles (each one published a snapshot)
    pub cycles: u64,
    /// Localization calls that failed and fell back
    pub failures: u64,
    /// Duration from the start of the last cycle to its publication
    pub last_cycle: Duration,
}

#[derive(Debug, Default)]
struct CycleCounters {
    cycles: AtomicU64,
    failures: AtomicU64,
    last_cycle_micros: AtomicU64,
}

impl CycleCounters {
    fn snapshot(&self) -> OrchestratorStats {
        OrchestratorStats {
            cycles: self.cycles.load(Ordering::Acquire),
            failures: self.failures.load(Ordering::Acquire),
            last_cycle: Duration::from_micros(self.last_cycle_micros.load(Ordering::Acquire)),
        }
    }
}

/// Drives the localization engine from the acquisition stream
#[derive(Clone)]
pub struct Orchestrator {
    config: OrchestratorConfig,
    stream: Arc<dyn AcquisitionStream>,
    engine: Arc<Mutex<Box<dyn LocalizationEngine>>>,
    snapshots: Arc<Published<SourceSnapshot>>,
    source_count: usize,
    counters: Arc<CycleCounters>,
}

impl Orchestrator {
    /// Create an orchestrator. The published snapshot starts out with every
    /// source unknown.
    pub fn new(
        config: OrchestratorConfig,
        stream: Arc<dyn AcquisitionStream>,
        engine: Box<dyn LocalizationEngine>,
    ) -> Self {
        let source_count = engine.source_count();
        Self {
            config,
            stream,
            engine: Arc::new(Mutex::new(engine)),
            snapshots: Arc::new(Published::new(SourceSnapshot::initial(source_count))),
            source_count,
            counters: Arc::new(CycleCounters::default()),
        }
    }

    /// Number of sources every published snapshot contains
    pub fn source_count(&self) -> usize {
        self.source_count
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// The cell readers load snapshots from
    pub fn snapshots(&self) -> Arc<Published<SourceSnapshot>> {
        Arc::clone(&self.snapshots)
    }

    pub fn stats(&self) -> OrchestratorStats {
        self.counters.snapshot()
    }

    /// Run one localization cycle synchronously and publish its snapshot.
    ///
    /// Blocks for as long as the engine takes; the async loop calls this on
    /// the blocking pool. Concurrent calls are serialized on the engine, so
    /// every snapshot gets its own cycle number and falls back against the
    /// one published before it.
    pub fn run_cycle(&self) -> Arc<SourceSnapshot> {
        let mut engine = self.engine.lock();
        let started = Instant::now();
        let cycle = self.counters.cycles.load(Ordering::Acquire) + 1;
        let sample = self.stream.current_sample();
        let previous = self.snapshots.load();

        let (snapshot, failures) =
            localize_all(engine.as_mut(), &sample, &previous, self.source_count, cycle);

        let snapshot = Arc::new(snapshot);
        self.snapshots.publish_arc(Arc::clone(&snapshot));

        let elapsed = started.elapsed();
        self.counters
            .last_cycle_micros
            .store(elapsed.as_micros() as u64, Ordering::Release);
        self.counters.failures.fetch_add(failures as u64, Ordering::AcqRel);
        self.counters.cycles.store(cycle, Ordering::Release);
        drop(engine);

        log::debug!(
            "Published snapshot {} from sample {} in {:?} ({} of {} sources fresh)",
            cycle,
            sample.sequence,
            elapsed,
            snapshot.fresh_count(),
            snapshot.len()
        );
        snapshot
    }

    /// Run cycles every period until `cancel` fires.
    ///
    /// Cancellation does not wait for an in-flight cycle: the blocking
    /// localization call is left to finish on its own and its snapshot, if
    /// any, is still published.
    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.config.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        log::info!(
            "Orchestrator started: {} sources every {:?}",
            self.source_count,
            self.config.period
        );

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => break,

                _ = ticker.tick() => {}
            }

            let worker = self.clone();
            let cycle = tokio::task::spawn_blocking(move || worker.run_cycle());

            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    log::debug!("Abandoning in-flight localization cycle");
                    break;
                }

                result = cycle => {
                    if let Err(e) = result {
                        log::error!("Localization cycle task failed: {}", e);
                    }
                }
            }
        }

        log::info!("Orchestrator stopped after {} cycles", self.stats().cycles);
    }

    /// Spawn the periodic loop on `handle`
    pub fn spawn(self, handle: &Handle) -> OrchestratorHandle {
        let cancel = CancellationToken::new();
        let snapshots = self.snapshots();
        let counters = Arc::clone(&self.counters);
        let task = handle.spawn(self.run(cancel.clone()));
        OrchestratorHandle {
            cancel,
            task,
            snapshots,
            counters,
        }
    }
}

/// Handle to a spawned orchestrator loop
pub struct OrchestratorHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
    snapshots: Arc<Published<SourceSnapshot>>,
    counters: Arc<CycleCounters>,
}

impl OrchestratorHandle {
    pub fn snapshots(&self) -> Arc<Published<SourceSnapshot>> {
        Arc::clone(&self.snapshots)
    }

    pub fn stats(&self) -> OrchestratorStats {
        self.counters.snapshot()
    }

    /// Ask the loop to stop at its next suspension point
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Cancel the loop and wait for it to exit
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            log::error!("Orchestrator task ended abnormally: {}", e);
        }
    }
}

/// Localize every source from `sample`, falling back per source on failure.
///
/// Returns the new snapshot, always holding exactly `source_count`
/// estimates, and the number of sources that fell back.
fn localize_all(
    engine: &mut dyn LocalizationEngine,
    sample: &Sample,
    previous: &SourceSnapshot,
    source_count: usize,
    cycle: u64,
) -> (SourceSnapshot, usize) {
    let fallback = |index: usize| {
        previous
            .get(index)
            .copied()
            .map(SourceEstimate::into_stale)
            .unwrap_or_else(SourceEstimate::unknown)
    };

    if catch_unwind(AssertUnwindSafe(|| engine.set_data(sample))).is_err() {
        log::error!("Localization engine panicked while loading sample {}", sample.sequence);
        let estimates = (0..source_count).map(fallback).collect();
        return (SourceSnapshot::new(cycle, estimates), source_count);
    }

    let mut failures = 0;
    let estimates = (0..source_count)
        .map(|index| match catch_unwind(AssertUnwindSafe(|| engine.localize(index))) {
            Ok(Ok(position)) if position.coords.iter().all(|c| c.is_finite()) => {
                SourceEstimate::fresh(position)
            }
            Ok(Ok(position)) => {
                log::warn!("Source {} localized to non-finite {:?}; keeping previous", index, position);
                failures += 1;
                fallback(index)
            }
            Ok(Err(e)) => {
                log::warn!("{}; keeping previous position", e);
                failures += 1;
                fallback(index)
            }
            Err(_) => {
                log::warn!("Localization of source {} panicked; keeping previous position", index);
                failures += 1;
                fallback(index)
            }
        })
        .collect();

    (SourceSnapshot::new(cycle, estimates), failures)
}
