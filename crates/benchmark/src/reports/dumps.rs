//! Misclassification dumps.

use std::{
  io::{BufWriter, Write},
  path::{Path, PathBuf},
};

use crate::{Result, metrics::AccuracyReport};

/// `<stem>_fp.txt` and `<stem>_fn.txt` in `dir`, named after the test file.
pub fn dump_paths(dir: &Path, test_data: &Path) -> (PathBuf, PathBuf) {
  let stem = test_data
    .file_stem()
    .map(|s| s.to_string_lossy().into_owned())
    .unwrap_or_else(|| "test".to_string());
  (dir.join(format!("{stem}_fp.txt")), dir.join(format!("{stem}_fn.txt")))
}

fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
  let mut writer = BufWriter::new(std::fs::File::create(path)?);
  for line in lines {
    writeln!(writer, "{}", line)?;
  }
  writer.flush()?;
  Ok(())
}

/// Write both dumps; empty files are written when there is nothing to dump.
pub fn write_misclassified(dir: &Path, test_data: &Path, report: &AccuracyReport) -> Result<(PathBuf, PathBuf)> {
  let (fp_path, fn_path) = dump_paths(dir, test_data);
  write_lines(&fp_path, &report.false_positives)?;
  write_lines(&fn_path, &report.false_negatives)?;
  Ok((fp_path, fn_path))
}
