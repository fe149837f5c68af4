//! Timing summaries and their console rendering.

use std::time::Duration;

use colored::*;
use serde::Serialize;

/// Summary of the timed iterations of one named configuration.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TrialReport {
    pub name: String,
    pub trials: usize,
    pub mean_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    /// Rows touched by a single iteration.
    pub rows: usize,
    /// `rows` divided by the mean wall time. Zero if the mean rounds to zero.
    pub rows_per_sec: f64,
}

impl TrialReport {
    pub fn from_durations(name: impl Into<String>, rows: usize, durations: &[Duration]) -> Self {
        let millis: Vec<f64> = durations.iter().map(|d| d.as_secs_f64() * 1e3).collect();

        let trials = millis.len();
        let (mean_ms, min_ms, max_ms) = if trials == 0 {
            (0.0, 0.0, 0.0)
        } else {
            let sum: f64 = millis.iter().sum();
            let min = millis.iter().copied().fold(f64::INFINITY, f64::min);
            let max = millis.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (sum / trials as f64, min, max)
        };

        let rows_per_sec = if mean_ms > 0.0 {
            rows as f64 / (mean_ms / 1e3)
        } else {
            0.0
        };

        Self {
            name: name.into(),
            trials,
            mean_ms,
            min_ms,
            max_ms,
            rows,
            rows_per_sec,
        }
    }

    /// One fixed-width table row, uncolored.
    pub fn table_row(&self) -> String {
        format!(
            "{:<32} {:>6} {:>12.3} {:>12.3} {:>12.3} {:>14.0}",
            self.name, self.trials, self.mean_ms, self.min_ms, self.max_ms, self.rows_per_sec
        )
    }
}

pub fn table_header() -> String {
    format!(
        "{:<32} {:>6} {:>12} {:>12} {:>12} {:>14}",
        "configuration", "trials", "mean ms", "min ms", "max ms", "rows/s"
    )
}

/// Prints `reports` as a table on stdout.
pub fn print_table(reports: &[TrialReport]) {
    let header = table_header();
    println!("{}", header.bold());
    println!("{}", "-".repeat(header.len()).dimmed());
    for report in reports {
        let row = report.table_row();
        if report.name.starts_with("init_") {
            println!("{}", row.cyan());
        } else {
            println!("{}", row.green());
        }
    }
}
