//! Human-readable summaries printed at the end of a run.

use std::fmt::Write;

use engine::MemorySample;
use eval_core::to_mib;

use crate::{metrics::AccuracyReport, perf::PerfReport};

fn memory_line(out: &mut String, label: &str, sample: MemorySample) {
  let _ = writeln!(
    out,
    "{:<16} {:>12.4} {:>12.4}",
    label,
    to_mib(sample.resident_bytes as f64),
    to_mib(sample.virtual_bytes as f64)
  );
}

pub fn format_perf_summary(report: &PerfReport) -> String {
  let mut out = String::new();
  let latency = &report.latency;

  let _ = writeln!(
    out,
    "Eval time (μs), avg:{:.4} stdev:{:.4} min:{} max:{}",
    latency.mean, latency.stddev, latency.min, latency.max
  );
  let _ = writeln!(
    out,
    "Eval time (μs), p50:{:.1} p95:{:.1} p99:{:.1}",
    latency.p50, latency.p95, latency.p99
  );
  let _ = writeln!(out, "Total eval time: {:.4} m", report.total_time_ms as f64 / 60_000.0);
  let _ = writeln!(out);

  let _ = writeln!(out, "{:<16} {:>12} {:>12}", "Memory (MiB)", "resident", "virtual");
  memory_line(&mut out, "Init", report.init_memory);
  memory_line(&mut out, "Eval", report.eval_memory);
  memory_line(&mut out, "Total", report.total_memory);
  let _ = writeln!(
    out,
    "{:<16} {:>12.4} {:>12.4}",
    "Avg per call",
    to_mib(report.avg_call_memory.resident_bytes),
    to_mib(report.avg_call_memory.virtual_bytes)
  );

  out
}

pub fn format_accuracy_summary(report: &AccuracyReport) -> String {
  let mut out = String::new();
  let c = &report.counts;
  let m = &report.metrics;

  let _ = writeln!(out, "Skipped: {}", c.skipped);
  if c.unscored > 0 {
    let _ = writeln!(out, "Unscored: {}", c.unscored);
  }
  let _ = writeln!(out, "Positive: {}", report.positive);
  let _ = writeln!(out, "Negative: {}", report.negative);
  let _ = writeln!(out);

  let _ = writeln!(out, "{:>10} {:>10} {:>10} {:>10}", "", "P", "N", "Recall");
  let _ = writeln!(
    out,
    "{:>10} {:>10} {:>10} {:>10.4}",
    "P", c.true_positive, c.false_negative, m.true_positive_rate
  );
  let _ = writeln!(
    out,
    "{:>10} {:>10} {:>10} {:>10.4}",
    "N", c.false_positive, c.true_negative, m.false_positive_rate
  );
  let _ = writeln!(
    out,
    "{:>10} {:>10.4} {:>10.4}",
    "Precision", m.positive_predictive_value, m.false_omission_rate
  );
  let _ = writeln!(out);

  let _ = writeln!(out, "accuracy:  {:.6}", m.accuracy);
  let _ = writeln!(out, "error:     {:.6}", m.error_rate);
  let _ = writeln!(out);

  let _ = writeln!(out, "f1:        {:.6}", m.f1);
  let _ = writeln!(out, "precision: {:.6}", m.precision);
  let _ = writeln!(out, "recall:    {:.6}", m.recall);

  out
}
