//! Shared types for the model evaluation harness.
//!
//! - [`EvalConfig`]: layered TOML configuration (explicit file > working dir > user)
//! - [`DeviceId`]: pass-through device selector handed to the inference engine
//! - [`to_mib`]: byte to MiB conversion used by every memory report

mod config;
mod device;

pub use config::{BenchmarkConfig, ConfigError, EvalConfig, OutputConfig};
pub use device::DeviceId;

/// Bytes in one mebibyte.
pub const BYTES_IN_MIB: f64 = 1_048_576.0;

/// Convert a byte count (possibly negative, for deltas) to MiB.
pub fn to_mib(bytes: f64) -> f64 {
  bytes / BYTES_IN_MIB
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_to_mib() {
    assert!((to_mib(1_048_576.0) - 1.0).abs() < f64::EPSILON);
    assert!((to_mib(-524_288.0) + 0.5).abs() < f64::EPSILON);
    assert_eq!(to_mib(0.0), 0.0);
  }
}
