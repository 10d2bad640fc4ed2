//! Tab-separated perf outputs.

use std::{
  fs::OpenOptions,
  io::{BufWriter, Write},
  path::{Path, PathBuf},
};

use eval_core::{DeviceId, to_mib};

use crate::{Result, perf::PerfReport};

/// Header of the aggregate stats file. I/E/A = init/eval/average,
/// P/V = resident/virtual, all memory columns in MiB.
pub const STATS_HEADER: [&str; 12] = [
  "Model",
  "DeviceId",
  "latency:avg",
  "latency:stdev",
  "latency:min",
  "latency:max",
  "IPM",
  "IVM",
  "EPM",
  "EVM",
  "APM",
  "AVM",
];

pub fn samples_file_name(model: &str, device: DeviceId) -> String {
  format!("Samples_{}_{}.tsv", model, device.kind())
}

/// Write one latency value per line, overwriting any previous file.
pub fn write_samples_file(dir: &Path, model: &str, device: DeviceId, samples_us: &[u64]) -> Result<PathBuf> {
  let path = dir.join(samples_file_name(model, device));
  let mut writer = BufWriter::new(std::fs::File::create(&path)?);
  for sample in samples_us {
    writeln!(writer, "{}", sample)?;
  }
  writer.flush()?;
  Ok(path)
}

fn stats_row(report: &PerfReport) -> String {
  let mib = |bytes: i64| format!("{:.4}", to_mib(bytes as f64));
  let fields = [
    report.model.clone(),
    report.device.to_string(),
    format!("{:.4}", report.latency.mean),
    format!("{:.4}", report.latency.stddev),
    report.latency.min.to_string(),
    report.latency.max.to_string(),
    mib(report.init_memory.resident_bytes),
    mib(report.init_memory.virtual_bytes),
    mib(report.eval_memory.resident_bytes),
    mib(report.eval_memory.virtual_bytes),
    format!("{:.4}", to_mib(report.avg_call_memory.resident_bytes)),
    format!("{:.4}", to_mib(report.avg_call_memory.virtual_bytes)),
  ];
  fields.join("\t")
}

/// Append one row, writing the header first if the file is new.
pub fn append_stats_row(path: &Path, report: &PerfReport) -> Result<()> {
  let write_header = !path.exists();
  let file = OpenOptions::new().create(true).append(true).open(path)?;
  let mut writer = BufWriter::new(file);

  if write_header {
    writeln!(writer, "{}", STATS_HEADER.join("\t"))?;
  }
  writeln!(writer, "{}", stats_row(report))?;
  writer.flush()?;
  Ok(())
}
