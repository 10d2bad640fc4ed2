//! Configuration for the evaluation harness.
//!
//! Config priority: explicit `--config` file > working directory (./model-eval.toml)
//! > user (~/.config/model-eval/config.toml) > built-in defaults.
//! CLI flags override whatever is loaded here.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "model-eval.toml";

/// Errors raised when an explicitly requested config file can't be used.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid config {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },
}

// ============================================================================
// Benchmark Configuration
// ============================================================================

/// Settings for the synthetic-load benchmark and progress reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
  /// Number of engine invocations in a perf run
  pub iterations: usize,
  /// Emit progress every N iterations / records
  pub progress_interval: usize,
  /// RNG seed for synthetic inputs (None = seeded from entropy)
  #[serde(skip_serializing_if = "Option::is_none")]
  pub seed: Option<u64>,
}

impl Default for BenchmarkConfig {
  fn default() -> Self {
    Self {
      iterations: 100_000,
      progress_interval: 500,
      seed: None,
    }
  }
}

// ============================================================================
// Output Configuration
// ============================================================================

/// Where and what to write after a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
  /// Directory for all report files
  pub directory: PathBuf,
  /// Append-mode aggregate stats file name
  pub stats_file: String,
  /// Write the per-call latency samples file
  pub write_samples: bool,
  /// Write false positive / false negative dumps
  pub write_dumps: bool,
}

impl Default for OutputConfig {
  fn default() -> Self {
    Self {
      directory: PathBuf::from("."),
      stats_file: "PermMeasurements.tsv".to_string(),
      write_samples: true,
      write_dumps: true,
    }
  }
}

// ============================================================================
// Main Config
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
  #[serde(default)]
  pub benchmark: BenchmarkConfig,

  #[serde(default)]
  pub output: OutputConfig,
}

impl EvalConfig {
  /// Load a config file that the user asked for by name. Failures are errors.
  pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Load config for a working directory, with fallback to user config
  pub fn load_for_dir(dir: &Path) -> Self {
    let local_config = dir.join(LOCAL_CONFIG_FILE);
    if local_config.exists()
      && let Ok(content) = std::fs::read_to_string(&local_config)
      && let Ok(config) = toml::from_str(&content)
    {
      debug!("Loaded config from {}", local_config.display());
      return config;
    }

    if let Some(user_config_path) = Self::user_config_path()
      && user_config_path.exists()
      && let Ok(content) = std::fs::read_to_string(&user_config_path)
      && let Ok(config) = toml::from_str(&content)
    {
      debug!("Loaded config from {}", user_config_path.display());
      return config;
    }

    Self::default()
  }

  /// Get the user-level config path
  pub fn user_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("CONFIG_DIR") {
      return Some(PathBuf::from(path).join("config.toml"));
    }

    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
      return Some(PathBuf::from(path).join("model-eval").join("config.toml"));
    }

    dirs::config_dir().map(|p: PathBuf| p.join("model-eval").join("config.toml"))
  }

  /// Generate a default config file as a string
  pub fn generate_template() -> String {
    let defaults = Self::default();
    format!(
      r#"# model-eval configuration
# Place in ./model-eval.toml or ~/.config/model-eval/config.toml

[benchmark]
# Engine invocations per perf run (/p)
iterations = {iterations}
# Progress cadence, in iterations (perf) or records (accuracy)
progress_interval = {progress_interval}
# Fix the synthetic input RNG for reproducible runs (uncomment to use):
# seed = 42

[output]
directory = "{directory}"
stats_file = "{stats_file}"
write_samples = {write_samples}
write_dumps = {write_dumps}
"#,
      iterations = defaults.benchmark.iterations,
      progress_interval = defaults.benchmark.progress_interval,
      directory = defaults.output.directory.display(),
      stats_file = defaults.output.stats_file,
      write_samples = defaults.output.write_samples,
      write_dumps = defaults.output.write_dumps,
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn test_defaults() {
    let config = EvalConfig::default();
    assert_eq!(config.benchmark.iterations, 100_000);
    assert_eq!(config.benchmark.progress_interval, 500);
    assert_eq!(config.benchmark.seed, None);
    assert_eq!(config.output.stats_file, "PermMeasurements.tsv");
    assert!(config.output.write_samples);
    assert!(config.output.write_dumps);
  }

  #[test]
  fn test_template_parses_to_defaults() {
    let parsed: EvalConfig = toml::from_str(&EvalConfig::generate_template()).unwrap();
    assert_eq!(parsed, EvalConfig::default());
  }

  #[test]
  fn test_partial_config_keeps_defaults() {
    let parsed: EvalConfig = toml::from_str("[benchmark]\niterations = 10\nseed = 7\n").unwrap();
    assert_eq!(parsed.benchmark.iterations, 10);
    assert_eq!(parsed.benchmark.seed, Some(7));
    assert_eq!(parsed.benchmark.progress_interval, 500);
    assert_eq!(parsed.output, OutputConfig::default());
  }

  #[test]
  fn test_load_for_dir_prefers_local_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
      dir.path().join(LOCAL_CONFIG_FILE),
      "[output]\nstats_file = \"perf.tsv\"\nwrite_dumps = false\n",
    )
    .unwrap();

    let config = EvalConfig::load_for_dir(dir.path());
    assert_eq!(config.output.stats_file, "perf.tsv");
    assert!(!config.output.write_dumps);
  }

  #[test]
  fn test_load_from_reports_parse_errors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[benchmark\niterations = ").unwrap();

    let err = EvalConfig::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
  }

  #[test]
  fn test_load_from_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = EvalConfig::load_from(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
  }
}
