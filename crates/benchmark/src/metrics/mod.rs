//! Metrics collection for benchmarking.
//!
//! Two categories:
//! - Performance: latency and memory series reduced to summary statistics
//! - Accuracy: confusion matrix and the rates derived from it

mod accuracy;
pub mod performance;
pub mod stats;

pub use accuracy::{AccuracyReport, ClassificationMetrics, ConfusionAccumulator, ConfusionCounts, Outcome};
pub use performance::{LatencyTracker, MemoryAverage, MemoryTracker};
pub use stats::{StatsError, SummaryStats};
