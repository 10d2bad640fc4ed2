//! Process memory readings.

use std::ops::Sub;

use serde::{Deserialize, Serialize};
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// Resident and virtual memory in bytes. Also used for signed deltas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySample {
  pub resident_bytes: i64,
  pub virtual_bytes: i64,
}

impl MemorySample {
  pub fn new(resident_bytes: i64, virtual_bytes: i64) -> Self {
    Self {
      resident_bytes,
      virtual_bytes,
    }
  }
}

impl Sub for MemorySample {
  type Output = MemorySample;

  fn sub(self, rhs: Self) -> Self::Output {
    MemorySample {
      resident_bytes: self.resident_bytes - rhs.resident_bytes,
      virtual_bytes: self.virtual_bytes - rhs.virtual_bytes,
    }
  }
}

/// Opaque source of process memory readings.
pub trait MemorySensor {
  fn sample(&mut self) -> MemorySample;
}

/// Memory sensor for the current process using sysinfo.
pub struct ProcessMemory {
  system: System,
  pid: Pid,
}

impl ProcessMemory {
  pub fn new() -> Self {
    Self {
      system: System::new(),
      pid: Pid::from_u32(std::process::id()),
    }
  }
}

impl Default for ProcessMemory {
  fn default() -> Self {
    Self::new()
  }
}

impl MemorySensor for ProcessMemory {
  fn sample(&mut self) -> MemorySample {
    // Only this process, only memory: this runs twice per benchmark iteration
    self.system.refresh_processes_specifics(
      ProcessesToUpdate::Some(&[self.pid]),
      true,
      ProcessRefreshKind::nothing().with_memory(),
    );

    match self.system.process(self.pid) {
      Some(process) => MemorySample::new(process.memory() as i64, process.virtual_memory() as i64),
      None => MemorySample::default(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_sample_difference() {
    let before = MemorySample::new(1_000, 5_000);
    let after = MemorySample::new(800, 6_000);
    assert_eq!(after - before, MemorySample::new(-200, 1_000));
  }

  #[test]
  fn test_process_memory_reports_current_process() {
    let mut sensor = ProcessMemory::new();
    let sample = sensor.sample();
    assert!(sample.resident_bytes > 0);
  }
}
