//! JSON report format for evaluation results.

use std::path::Path;

use chrono::{DateTime, Utc};
use eval_core::DeviceId;
use serde::{Deserialize, Serialize};

use crate::{Result, metrics::AccuracyReport, perf::PerfReport};

/// Complete run report in JSON format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
  /// Report metadata
  pub metadata: ReportMetadata,
  /// Mode-specific results
  pub result: RunResult,
}

/// Report metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
  /// Report generation timestamp
  pub timestamp: DateTime<Utc>,
  /// Harness version
  pub version: String,
  /// Hostname
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hostname: Option<String>,
  /// Model path as given on the command line
  pub model_path: String,
  pub device: DeviceId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RunResult {
  Perf(PerfReport),
  Accuracy(AccuracyReport),
}

impl RunReport {
  pub fn new(model_path: &Path, device: DeviceId, result: RunResult) -> Self {
    Self {
      metadata: ReportMetadata {
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        hostname: hostname::get().ok().and_then(|h| h.into_string().ok()),
        model_path: model_path.display().to_string(),
        device,
      },
      result,
    }
  }

  /// Save report to a file.
  pub fn save(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(self)?;
    std::fs::write(path, json)?;
    Ok(())
  }
}
