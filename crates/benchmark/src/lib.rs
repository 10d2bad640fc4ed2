//! Offline evaluation harness for binary classification models
//!
//! Drives an [`engine::InferenceEngine`] in two modes and turns its raw
//! per-sample output into reproducible statistics.
//!
//! ## Key Concepts
//!
//! - **Perf**: synthetic load, per-call latency and process memory deltas
//! - **Accuracy**: labeled test set, confusion matrix and derived metrics
//! - **Metrics**: confusion aggregation and summary statistics (mean, stddev, percentiles)
//! - **Reports**: TSV stats/samples files, FP/FN dumps, console tables and JSON

pub mod evaluation;
pub mod metrics;
pub mod perf;
pub mod progress;
pub mod reports;

pub use evaluation::{AccuracyEvaluation, read_dataset};
pub use metrics::{AccuracyReport, ClassificationMetrics, ConfusionAccumulator, ConfusionCounts, StatsError, SummaryStats};
pub use perf::{PerfBenchmark, PerfReport};
pub use reports::{RunReport, write_accuracy_reports, write_perf_reports};

use thiserror::Error;

/// Benchmark-specific errors
#[derive(Debug, Error)]
pub enum BenchmarkError {
  #[error("Parse error on line {line}: {source}")]
  Parse {
    line: usize,
    #[source]
    source: parser::ParseError,
  },

  #[error("Engine error: {0}")]
  Engine(#[from] engine::EngineError),

  #[error("Stats error: {0}")]
  Stats(#[from] StatsError),

  #[error("Config error: {0}")]
  Config(#[from] eval_core::ConfigError),

  #[error("Iteration count must be positive")]
  NoIterations,

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BenchmarkError>;
