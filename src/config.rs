// In: src/config.rs

//! The single source of truth for benchmark configuration.
//!
//! `BenchConfig` is created once at the binary boundary, either from compiled-in
//! defaults or from a JSON file, and then passed down by reference. Nothing in the
//! engine reads configuration on its own.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{IndisortError, Result};

/// The dataset scanned when no config file is given.
pub const DEFAULT_DATASET_URI: &str = "file:///mnt/s4/sort_data/lineitem_part";

//==================================================================================
// I. Core Configuration Enums
//==================================================================================

/// How many leading columns of the on-disk schema are decoded per batch.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColumnPrefix {
    /// Just the two key columns.
    Two,
    /// The two key columns plus two payload columns.
    #[default]
    Four,
}

impl ColumnPrefix {
    pub fn width(self) -> usize {
        match self {
            ColumnPrefix::Two => 2,
            ColumnPrefix::Four => 4,
        }
    }
}

/// Which key arity the benchmark exercises.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KeyMode {
    /// Column 0 only.
    #[default]
    Single,
    /// Column 0, then column 1. Runs the composite variants in addition to the
    /// single-key ones.
    TwoKey,
}

impl fmt::Display for KeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMode::Single => write!(f, "single"),
            KeyMode::TwoKey => write!(f, "two_key"),
        }
    }
}

impl FromStr for KeyMode {
    type Err = IndisortError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "single" => Ok(KeyMode::Single),
            "two_key" => Ok(KeyMode::TwoKey),
            other => Err(IndisortError::InvalidConfig(format!(
                "unknown key mode '{}'",
                other
            ))),
        }
    }
}

/// The state each timed trial starts from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrialStart {
    /// Reset the index to natural order before every trial.
    #[default]
    Natural,
    /// Keep whatever order the previous trial left behind.
    Previous,
}

//==================================================================================
// II. The Unified BenchConfig
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct BenchConfig {
    /// `file://` URI or plain path of the directory tree holding the data files.
    #[serde(default = "default_dataset_uri")]
    pub dataset_uri: String,

    #[serde(default)]
    pub column_prefix: ColumnPrefix,

    #[serde(default)]
    pub key_mode: KeyMode,

    /// Timed iterations per named configuration.
    #[serde(default = "default_trials")]
    pub trials: usize,

    /// Untimed iterations run before the timed ones.
    #[serde(default = "default_warmup")]
    pub warmup: usize,

    #[serde(default)]
    pub trial_start: TrialStart,

    /// If true, every sort trial is checked for order and permutation afterwards.
    /// The check runs outside the timed region.
    #[serde(default)]
    pub verify: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            dataset_uri: default_dataset_uri(),
            column_prefix: ColumnPrefix::default(),
            key_mode: KeyMode::default(),
            trials: default_trials(),
            warmup: default_warmup(),
            trial_start: TrialStart::default(),
            verify: false,
        }
    }
}

impl BenchConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: BenchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(IndisortError::InvalidConfig(
                "trials must be at least 1".to_string(),
            ));
        }
        if self.dataset_uri.trim().is_empty() {
            return Err(IndisortError::InvalidConfig(
                "dataset_uri must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_dataset_uri() -> String {
    DEFAULT_DATASET_URI.to_string()
}

fn default_trials() -> usize {
    5
}

fn default_warmup() -> usize {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = BenchConfig::from_json_str("{}").unwrap();
        assert_eq!(config, BenchConfig::default());
        assert_eq!(config.column_prefix.width(), 4);
    }

    #[test]
    fn test_json_overrides() {
        let json = r#"{
            "dataset_uri": "/tmp/lineitem",
            "column_prefix": "two",
            "key_mode": "two_key",
            "trials": 3,
            "trial_start": "previous",
            "verify": true
        }"#;
        let config = BenchConfig::from_json_str(json).unwrap();
        assert_eq!(config.dataset_uri, "/tmp/lineitem");
        assert_eq!(config.column_prefix, ColumnPrefix::Two);
        assert_eq!(config.key_mode, KeyMode::TwoKey);
        assert_eq!(config.trials, 3);
        assert_eq!(config.warmup, 1);
        assert_eq!(config.trial_start, TrialStart::Previous);
        assert!(config.verify);
    }

    #[test]
    fn test_zero_trials_rejected() {
        let err = BenchConfig::from_json_str(r#"{"trials": 0}"#).unwrap_err();
        assert!(matches!(err, IndisortError::InvalidConfig(_)));
    }

    #[test]
    fn test_key_mode_parse() {
        assert_eq!("two_key".parse::<KeyMode>().unwrap(), KeyMode::TwoKey);
        assert!("three_key".parse::<KeyMode>().is_err());
        assert_eq!(KeyMode::Single.to_string(), "single");
    }
}
