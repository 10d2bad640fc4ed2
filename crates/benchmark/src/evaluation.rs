//! Accuracy evaluation over a labeled test set.
//!
//! Every line is parsed at the model's declared input dimension, scored once,
//! argmax-decoded and folded into a [`ConfusionAccumulator`]. Vectors are
//! dropped as soon as they have been counted; only misclassified original
//! lines are kept for the dumps.

use std::path::Path;

use engine::{EngineError, InferenceEngine, ModelGuard};
use eval_core::{BenchmarkConfig, DeviceId};
use parser::{FEATURES_GROUP, parse_record};
use tracing::{debug, info};

use crate::{
  BenchmarkError, Result,
  metrics::{AccuracyReport, ConfusionAccumulator},
  progress::Progress,
};

/// Read a test set, one record per line.
///
/// Blank lines are kept so that positions stay aligned with the file; the
/// accuracy driver skips them.
pub fn read_dataset(path: &Path) -> Result<Vec<String>> {
  let content = std::fs::read_to_string(path)?;
  let lines: Vec<String> = content.lines().map(str::to_string).collect();
  info!("Read {} lines from {}", lines.len(), path.display());
  Ok(lines)
}

/// Accuracy driver.
#[derive(Debug, Clone)]
pub struct AccuracyEvaluation {
  progress_interval: usize,
  show_progress: bool,
}

impl AccuracyEvaluation {
  pub fn new(config: &BenchmarkConfig) -> Self {
    Self {
      progress_interval: config.progress_interval,
      show_progress: true,
    }
  }

  pub fn with_progress(mut self, show: bool) -> Self {
    self.show_progress = show;
    self
  }

  pub fn run<E, S>(&self, engine: &mut E, model_path: &Path, device: DeviceId, lines: &[S]) -> Result<AccuracyReport>
  where
    E: InferenceEngine,
    S: AsRef<str>,
  {
    info!("Evaluating using device {}", device);
    let mut model = ModelGuard::load(engine, model_path, device)?;

    let (input_name, dimensions) = model.preferred_input(FEATURES_GROUP)?;
    let (output_name, output_size) = model.first_output()?;
    info!("Input size: {}", dimensions);
    info!("Output name: {}, Output size: {}", output_name, output_size);

    let mut acc = ConfusionAccumulator::new();
    let progress = Progress::new(lines.len(), self.progress_interval, self.show_progress);

    info!("Evaluating test set...");
    for (i, line) in lines.iter().enumerate() {
      progress.update(i);

      let line = line.as_ref();
      if line.trim().is_empty() {
        continue;
      }

      let mut vector = parse_record(line, dimensions).map_err(|source| BenchmarkError::Parse {
        line: i + 1,
        source,
      })?;

      if vector.skipped {
        acc.record_vector(&vector);
        continue;
      }

      if input_name != FEATURES_GROUP
        && let Some(dense) = vector.features.remove(FEATURES_GROUP)
      {
        vector.features.insert(input_name.clone(), dense);
      }

      let scores = model.run(&vector.features, &output_name)?;
      if vector.decode_output(scores).is_none() {
        return Err(EngineError::Invoke(format!("model returned no scores for line {}", i + 1)).into());
      }
      acc.record_vector(&vector);
    }
    progress.finish("done");
    drop(model);

    let report = acc.finish();
    debug!(
      "Scored {} of {} records ({} skipped)",
      report.counts.total(),
      report.records,
      report.counts.skipped
    );
    Ok(report)
  }
}
