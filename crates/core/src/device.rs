use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Device selector passed unchanged to the inference engine.
///
/// `-1` forces CPU, `0..` selects a GPU by index, and [`DeviceId::AUTO`] lets
/// the engine pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub i32);

impl DeviceId {
  pub const CPU: DeviceId = DeviceId(-1);
  pub const AUTO: DeviceId = DeviceId(-4);

  pub fn is_cpu(self) -> bool {
    self == Self::CPU
  }

  /// Short tag used in sample file names.
  pub fn kind(self) -> &'static str {
    if self.is_cpu() { "cpu" } else { "gpu" }
  }
}

impl Default for DeviceId {
  fn default() -> Self {
    Self::AUTO
  }
}

impl fmt::Display for DeviceId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl FromStr for DeviceId {
  type Err = std::num::ParseIntError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    s.trim().parse::<i32>().map(DeviceId)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_is_auto() {
    assert_eq!(DeviceId::default(), DeviceId(-4));
    assert_eq!(DeviceId::default(), DeviceId::AUTO);
  }

  #[test]
  fn test_kind() {
    assert_eq!(DeviceId::CPU.kind(), "cpu");
    assert_eq!(DeviceId(0).kind(), "gpu");
    assert_eq!(DeviceId(3).kind(), "gpu");
    // Automatic selection is reported as gpu, same as any non-CPU selector
    assert_eq!(DeviceId::AUTO.kind(), "gpu");
  }

  #[test]
  fn test_parse() {
    assert_eq!("-1".parse::<DeviceId>().unwrap(), DeviceId::CPU);
    assert_eq!(" 2 ".parse::<DeviceId>().unwrap(), DeviceId(2));
    assert!("gpu".parse::<DeviceId>().is_err());
  }
}
