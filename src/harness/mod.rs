// In: src/harness/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Benchmark Harness
// ====================================================================================
//
// A run walks the same sequence every time:
//
//   init_data        LoadTrial        sources  -> ChunkStore
//   init_orderings   IndexBuildTrial  store    -> LogicalIndex
//   [ data ready ]   ReadinessNotice, once per run
//   sort/<k>/<a>     SortTrial        one per (key policy, algorithm) variant
//
// Each named configuration is measured by a `TrialSet`: `warmup` untimed
// iterations, then `trials` timed ones. Only `Trial::run` sits inside the timed
// region; `setup` and `verify` run outside it.
// ====================================================================================

use std::io::Write;
use std::time::{Duration, Instant};

use crate::chunk_store::source::{BatchSource, ParquetSource};
use crate::config::{BenchConfig, KeyMode};
use crate::error::Result;
use crate::log_metric;
use crate::ordering::{Algorithm, KeyPolicyKind};

pub mod report;
pub mod trials;

pub use self::report::{print_table, TrialReport};
pub use self::trials::{IndexBuildTrial, LoadTrial, SortTrial};

//==================================================================================
// 1. The Trial Contract
//==================================================================================

/// **CONTRACT:** one measurable unit of work.
pub trait Trial {
    /// Prepares the starting state of the next iteration. Not timed.
    fn setup(&mut self) -> Result<()> {
        Ok(())
    }

    /// The timed work.
    fn run(&mut self) -> Result<()>;

    /// Checks the state a timed iteration left behind. Not timed.
    fn verify(&self) -> Result<()> {
        Ok(())
    }

    /// Rows touched by one iteration, for throughput.
    fn rows(&self) -> usize;
}

//==================================================================================
// 2. Trial Sets
//==================================================================================

/// Repeats one named trial and summarizes its wall times.
#[derive(Debug, Clone)]
pub struct TrialSet {
    name: String,
    trials: usize,
    warmup: usize,
}

impl TrialSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            trials: 5,
            warmup: 1,
        }
    }

    pub fn from_config(name: impl Into<String>, config: &BenchConfig) -> Self {
        Self::new(name)
            .with_trials(config.trials)
            .with_warmup(config.warmup)
    }

    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_warmup(mut self, warmup: usize) -> Self {
        self.warmup = warmup;
        self
    }

    pub fn run<T: Trial>(&self, trial: &mut T) -> Result<TrialReport> {
        for _ in 0..self.warmup {
            trial.setup()?;
            trial.run()?;
        }

        let mut durations: Vec<Duration> = Vec::with_capacity(self.trials);
        for _ in 0..self.trials {
            trial.setup()?;
            let start = Instant::now();
            trial.run()?;
            durations.push(start.elapsed());
            trial.verify()?;
        }

        let report = TrialReport::from_durations(self.name.clone(), trial.rows(), &durations);
        log::info!(
            "{}: mean {:.3} ms over {} trials ({} rows)",
            report.name,
            report.mean_ms,
            report.trials,
            report.rows
        );
        Ok(report)
    }
}

//==================================================================================
// 3. The Readiness Notice
//==================================================================================

/// Prints `[ data ready: N entries ]` the first time it is announced, and never
/// again. Owned by a `BenchRun`, so each run gets exactly one.
#[derive(Debug, Default)]
pub struct ReadinessNotice {
    announced: Option<usize>,
}

impl ReadinessNotice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(entries: usize) -> String {
        format!("[ data ready: {} entries ]", entries)
    }

    /// Prints the notice on stdout. Returns `true` if this call printed it.
    pub fn announce(&mut self, entries: usize) -> bool {
        self.announce_to(&mut std::io::stdout().lock(), entries)
    }

    pub fn announce_to<W: Write>(&mut self, out: &mut W, entries: usize) -> bool {
        if self.announced.is_some() {
            return false;
        }
        if let Err(e) = writeln!(out, "{}", Self::message(entries)) {
            log::warn!("could not print readiness notice: {}", e);
        }
        log::debug!("data ready: {} entries", entries);
        self.announced = Some(entries);
        true
    }

    /// The entry count that was announced, if any.
    pub fn announced(&self) -> Option<usize> {
        self.announced
    }
}

//==================================================================================
// 4. Benchmark Runs
//==================================================================================

/// Every sort variant a key mode asks for, single-key ones first.
pub fn sort_variants(key_mode: KeyMode) -> Vec<(KeyPolicyKind, Algorithm)> {
    KeyPolicyKind::ALL
        .into_iter()
        .filter(|kind| key_mode == KeyMode::TwoKey || !kind.is_composite())
        .flat_map(|kind| Algorithm::ALL.into_iter().map(move |algorithm| (kind, algorithm)))
        .collect()
}

pub struct BenchRun {
    config: BenchConfig,
    notice: ReadinessNotice,
    reports: Vec<TrialReport>,
}

impl BenchRun {
    pub fn new(config: BenchConfig) -> Self {
        Self {
            config,
            notice: ReadinessNotice::new(),
            reports: Vec::new(),
        }
    }

    pub fn notice(&self) -> &ReadinessNotice {
        &self.notice
    }

    pub fn reports(&self) -> &[TrialReport] {
        &self.reports
    }

    /// Runs every named configuration against the configured dataset.
    pub fn run(&mut self) -> Result<()> {
        self.config.validate()?;
        let sources = ParquetSource::open_all(&self.config.dataset_uri)?;
        log::info!(
            "opened {} data files under {}",
            sources.len(),
            self.config.dataset_uri
        );
        self.run_on(&sources)
    }

    /// Runs every named configuration against `sources`.
    pub fn run_on<S: BatchSource>(&mut self, sources: &[S]) -> Result<()> {
        let prefix = self.config.column_prefix.width();

        let mut load = LoadTrial::new(sources, prefix);
        let report = TrialSet::from_config("init_data", &self.config).run(&mut load)?;
        self.reports.push(report);
        let store = load.into_store()?;

        let mut build = IndexBuildTrial::new(&store);
        let report = TrialSet::from_config("init_orderings", &self.config).run(&mut build)?;
        self.reports.push(report);
        let mut index = build.into_index();

        self.notice.announce(index.len());

        for (kind, algorithm) in sort_variants(self.config.key_mode) {
            let mut trial = SortTrial::new(&store, &mut index, kind, algorithm)
                .with_start(self.config.trial_start)
                .with_verify(self.config.verify);
            let report = TrialSet::from_config(trial.name(), &self.config).run(&mut trial)?;
            self.reports.push(report);
        }

        log_metric!("event"="run_finished", "configurations"=self.reports.len());
        Ok(())
    }

    pub fn print_report(&self) {
        print_table(&self.reports);
    }
}
