//! Progress reporting at a fixed cadence.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

/// Progress bar updated every `interval` steps and on the final step.
pub struct Progress {
  bar: ProgressBar,
  interval: usize,
  len: usize,
}

impl Progress {
  pub fn new(len: usize, interval: usize, visible: bool) -> Self {
    let bar = if visible {
      let pb = ProgressBar::new(len as u64);
      pb.set_style(
        ProgressStyle::default_bar()
          .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {percent}% {msg}")
          .unwrap_or_else(|_| ProgressStyle::default_bar())
          .progress_chars("#>-"),
      );
      pb
    } else {
      ProgressBar::hidden()
    };

    Self {
      bar,
      interval: interval.max(1),
      len,
    }
  }

  /// Whether `step` (0-based) falls on the reporting cadence.
  pub fn is_due(&self, step: usize) -> bool {
    step % self.interval == 0 || step + 1 == self.len
  }

  pub fn update(&self, step: usize) {
    if self.is_due(step) {
      self.bar.set_position(step as u64);
      debug!("progress {}/{}", step, self.len);
    }
  }

  pub fn finish(&self, message: &'static str) {
    self.bar.set_position(self.len as u64);
    self.bar.finish_with_message(message);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_cadence() {
    let progress = Progress::new(1201, 500, false);
    let due: Vec<usize> = (0..1201).filter(|&i| progress.is_due(i)).collect();
    assert_eq!(due, vec![0, 500, 1000, 1200]);
  }

  #[test]
  fn test_zero_interval_reports_every_step() {
    let progress = Progress::new(3, 0, false);
    assert!((0..3).all(|i| progress.is_due(i)));
  }
}
