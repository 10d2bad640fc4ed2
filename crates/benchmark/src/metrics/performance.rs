//! Performance metrics collection.

use std::time::Duration;

use engine::MemorySample;
use serde::{Deserialize, Serialize};

use super::stats::{StatsError, SummaryStats};

/// Latency tracker for collecting per-call timing measurements.
#[derive(Debug, Default)]
pub struct LatencyTracker {
  samples_us: Vec<u64>,
}

impl LatencyTracker {
  /// Create a tracker sized for `capacity` calls.
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      samples_us: Vec::with_capacity(capacity),
    }
  }

  /// Record a duration, truncated to whole microseconds.
  pub fn record(&mut self, duration: Duration) {
    self.samples_us.push(duration.as_micros() as u64);
  }

  pub fn into_samples(self) -> Vec<u64> {
    self.samples_us
  }

  /// Get statistics from recorded durations, in microseconds.
  pub fn stats(&self) -> Result<SummaryStats, StatsError> {
    let values: Vec<f64> = self.samples_us.iter().map(|&us| us as f64).collect();
    SummaryStats::from_samples(&values)
  }
}

/// Mean per-call memory change, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryAverage {
  pub resident_bytes: f64,
  pub virtual_bytes: f64,
}

/// Accumulates memory deltas straddling individual engine calls.
#[derive(Debug, Default)]
pub struct MemoryTracker {
  resident_sum: i64,
  virtual_sum: i64,
  calls: usize,
}

impl MemoryTracker {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn record(&mut self, delta: MemorySample) {
    self.resident_sum += delta.resident_bytes;
    self.virtual_sum += delta.virtual_bytes;
    self.calls += 1;
  }

  /// Plain arithmetic mean of the raw deltas; 0 when nothing was recorded.
  pub fn average(&self) -> MemoryAverage {
    if self.calls == 0 {
      return MemoryAverage::default();
    }
    MemoryAverage {
      resident_bytes: self.resident_sum as f64 / self.calls as f64,
      virtual_bytes: self.virtual_sum as f64 / self.calls as f64,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_latency_stats_from_durations() {
    let mut tracker = LatencyTracker::with_capacity(5);
    for ms in [100, 200, 300, 400, 500] {
      tracker.record(Duration::from_millis(ms));
    }

    let stats = tracker.stats().unwrap();
    assert_eq!(stats.min, 100_000.0);
    assert_eq!(stats.max, 500_000.0);
    assert_eq!(stats.mean, 300_000.0);
    assert_eq!(stats.p50, 300_000.0);
    assert_eq!(stats.count, 5);
    assert_eq!(tracker.into_samples(), vec![100_000, 200_000, 300_000, 400_000, 500_000]);
  }

  #[test]
  fn test_latency_truncates_to_micros() {
    let mut tracker = LatencyTracker::default();
    tracker.record(Duration::from_nanos(1_999));
    assert_eq!(tracker.into_samples(), vec![1]);
  }

  #[test]
  fn test_latency_stats_empty() {
    assert_eq!(LatencyTracker::default().stats(), Err(StatsError::EmptyInput));
  }

  #[test]
  fn test_memory_average() {
    let mut tracker = MemoryTracker::new();
    tracker.record(MemorySample::new(4096, 0));
    tracker.record(MemorySample::new(0, 8192));
    tracker.record(MemorySample::new(-1024, 0));

    let avg = tracker.average();
    assert!((avg.resident_bytes - 1024.0).abs() < f64::EPSILON);
    assert!((avg.virtual_bytes - 8192.0 / 3.0).abs() < 1e-9);
  }

  #[test]
  fn test_memory_average_empty() {
    assert_eq!(MemoryTracker::new().average(), MemoryAverage::default());
  }
}
