//! Report generation for evaluation results.
//!
//! - TSV: per-run latency samples and the append-mode aggregate stats file
//! - Dumps: original lines of false positives / false negatives
//! - Console: confusion table and memory summary
//! - JSON: machine-readable report with run metadata

mod console;
mod dumps;
mod json;
mod tsv;

use std::path::{Path, PathBuf};

use eval_core::OutputConfig;
use tracing::info;

pub use console::{format_accuracy_summary, format_perf_summary};
pub use dumps::{dump_paths, write_misclassified};
pub use json::{ReportMetadata, RunReport, RunResult};
pub use tsv::{STATS_HEADER, append_stats_row, samples_file_name, write_samples_file};

use crate::{Result, metrics::AccuracyReport, perf::PerfReport};

/// Write the samples file and append to the stats file, as configured.
pub fn write_perf_reports(report: &PerfReport, output: &OutputConfig) -> Result<Vec<PathBuf>> {
  std::fs::create_dir_all(&output.directory)?;
  let mut written = Vec::new();

  if output.write_samples {
    let path = write_samples_file(&output.directory, &report.model, report.device, &report.latency_samples_us)?;
    info!("Wrote {} latency samples to {}", report.latency_samples_us.len(), path.display());
    written.push(path);
  }

  let stats_path = output.directory.join(&output.stats_file);
  append_stats_row(&stats_path, report)?;
  info!("Appended stats to {}", stats_path.display());
  written.push(stats_path);

  Ok(written)
}

/// Write the false positive / false negative dumps for `test_data`, as configured.
pub fn write_accuracy_reports(report: &AccuracyReport, test_data: &Path, output: &OutputConfig) -> Result<Vec<PathBuf>> {
  if !output.write_dumps {
    return Ok(Vec::new());
  }

  std::fs::create_dir_all(&output.directory)?;
  let (fp_path, fn_path) = write_misclassified(&output.directory, test_data, report)?;
  info!(
    "Wrote {} false positives to {}, {} false negatives to {}",
    report.false_positives.len(),
    fp_path.display(),
    report.false_negatives.len(),
    fn_path.display()
  );
  Ok(vec![fp_path, fn_path])
}
