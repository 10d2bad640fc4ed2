//! Summary statistics over sample series.
//!
//! Pure functions; reductions that need ordering sort a private copy so the
//! caller's series is never reordered.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
  #[error("empty sample series")]
  EmptyInput,

  #[error("percentile {0} outside [0, 1]")]
  PercentileOutOfRange(f64),
}

/// Arithmetic mean, 0 for an empty series.
pub fn mean(samples: &[f64]) -> f64 {
  if samples.is_empty() {
    return 0.0;
  }
  samples.iter().sum::<f64>() / samples.len() as f64
}

/// Sample standard deviation (n - 1 denominator), 0 when n <= 1.
pub fn sample_stddev(samples: &[f64]) -> f64 {
  if samples.len() <= 1 {
    return 0.0;
  }
  let avg = mean(samples);
  let sum: f64 = samples.iter().map(|s| (s - avg).powi(2)).sum();
  (sum / (samples.len() - 1) as f64).sqrt()
}

pub fn min(samples: &[f64]) -> Result<f64, StatsError> {
  samples.iter().copied().reduce(f64::min).ok_or(StatsError::EmptyInput)
}

pub fn max(samples: &[f64]) -> Result<f64, StatsError> {
  samples.iter().copied().reduce(f64::max).ok_or(StatsError::EmptyInput)
}

/// Linear-interpolation percentile, `p` in `[0, 1]`.
pub fn percentile(samples: &[f64], p: f64) -> Result<f64, StatsError> {
  if samples.is_empty() {
    return Err(StatsError::EmptyInput);
  }
  if !(0.0..=1.0).contains(&p) {
    return Err(StatsError::PercentileOutOfRange(p));
  }
  Ok(percentile_sorted(&sorted_copy(samples), p))
}

fn sorted_copy(samples: &[f64]) -> Vec<f64> {
  let mut sorted = samples.to_vec();
  sorted.sort_by(f64::total_cmp);
  sorted
}

/// Rank r = (n - 1) * p + 1, interpolated between floor(r) and floor(r) + 1.
/// `sorted` must be non-empty.
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
  let n = sorted.len();
  let rank = (n - 1) as f64 * p + 1.0;
  if rank <= 1.0 {
    return sorted[0];
  }
  if rank >= n as f64 {
    return sorted[n - 1];
  }

  let k = rank.floor() as usize;
  let d = rank - k as f64;
  sorted[k - 1] + d * (sorted[k] - sorted[k - 1])
}

/// Distribution summary of one sample series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
  /// Sample count
  pub count: usize,
  pub mean: f64,
  /// Sample standard deviation
  pub stddev: f64,
  pub min: f64,
  pub max: f64,
  /// Median
  pub p50: f64,
  /// 95th percentile
  pub p95: f64,
  /// 99th percentile
  pub p99: f64,
}

impl SummaryStats {
  pub fn from_samples(samples: &[f64]) -> Result<Self, StatsError> {
    if samples.is_empty() {
      return Err(StatsError::EmptyInput);
    }

    let sorted = sorted_copy(samples);
    Ok(Self {
      count: samples.len(),
      mean: mean(samples),
      stddev: sample_stddev(samples),
      min: sorted[0],
      max: sorted[sorted.len() - 1],
      p50: percentile_sorted(&sorted, 0.50),
      p95: percentile_sorted(&sorted, 0.95),
      p99: percentile_sorted(&sorted, 0.99),
    })
  }
}
