//! Reference engine: a linear scorer described by a JSON file.
//!
//! ```json
//! { "input": "features", "output": "scores",
//!   "weights": [[0.1, -0.2, 0.0], [-0.1, 0.2, 0.3]],
//!   "bias": [0.0, 0.5] }
//! ```
//! One weight row per class; `scores = W·x + b`.

use std::path::Path;

use eval_core::DeviceId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{EngineError, InferenceEngine, Inputs, Result, Shape};

fn default_input() -> String {
  "features".to_string()
}

fn default_output() -> String {
  "scores".to_string()
}

/// On-disk model description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModelSpec {
  #[serde(default = "default_input")]
  pub input: String,
  #[serde(default = "default_output")]
  pub output: String,
  pub weights: Vec<Vec<f32>>,
  #[serde(default)]
  pub bias: Vec<f32>,
}

/// A validated, loaded linear model.
#[derive(Debug, Clone)]
pub struct LinearModel {
  spec: LinearModelSpec,
  dimensions: usize,
}

impl LinearModel {
  pub fn from_spec(spec: LinearModelSpec) -> std::result::Result<Self, String> {
    let dimensions = match spec.weights.first() {
      Some(row) => row.len(),
      None => return Err("model has no weight rows".to_string()),
    };
    if let Some((idx, row)) = spec.weights.iter().enumerate().find(|(_, r)| r.len() != dimensions) {
      return Err(format!(
        "weight row {} has {} values, expected {}",
        idx,
        row.len(),
        dimensions
      ));
    }
    if !spec.bias.is_empty() && spec.bias.len() != spec.weights.len() {
      return Err(format!(
        "bias has {} values, expected {}",
        spec.bias.len(),
        spec.weights.len()
      ));
    }
    Ok(Self { spec, dimensions })
  }

  pub fn classes(&self) -> usize {
    self.spec.weights.len()
  }

  pub fn dimensions(&self) -> usize {
    self.dimensions
  }

  fn score(&self, x: &[f32]) -> Vec<f32> {
    self
      .spec
      .weights
      .iter()
      .enumerate()
      .map(|(class, row)| {
        let dot: f32 = row.iter().zip(x).map(|(w, v)| w * v).sum();
        dot + self.spec.bias.get(class).copied().unwrap_or(0.0)
      })
      .collect()
  }
}

/// Stateless engine for [`LinearModel`] files. Runs on the CPU whatever the
/// device selector says.
#[derive(Debug, Default)]
pub struct LinearEngine;

impl LinearEngine {
  pub fn new() -> Self {
    Self
  }
}

impl InferenceEngine for LinearEngine {
  type Handle = LinearModel;

  fn load(&mut self, model_path: &Path, device: DeviceId) -> Result<LinearModel> {
    let load_err = |reason: String| EngineError::Load {
      path: model_path.to_path_buf(),
      reason,
    };

    let content = std::fs::read_to_string(model_path).map_err(|e| load_err(e.to_string()))?;
    let spec: LinearModelSpec = serde_json::from_str(&content).map_err(|e| load_err(e.to_string()))?;
    let model = LinearModel::from_spec(spec).map_err(load_err)?;

    if !device.is_cpu() {
      debug!("Linear engine ignores device {}, running on CPU", device);
    }
    info!(
      "Loaded linear model: {} classes x {} features",
      model.classes(),
      model.dimensions()
    );
    Ok(model)
  }

  fn input_shape(&self, handle: &LinearModel) -> Shape {
    Shape::from([(handle.spec.input.clone(), handle.dimensions)])
  }

  fn output_shape(&self, handle: &LinearModel) -> Shape {
    Shape::from([(handle.spec.output.clone(), handle.classes())])
  }

  fn run(&mut self, handle: &LinearModel, inputs: &Inputs, output: &str) -> Result<Vec<f32>> {
    if output != handle.spec.output {
      return Err(EngineError::UnknownOutput(output.to_string()));
    }
    let x = inputs
      .get(&handle.spec.input)
      .ok_or_else(|| EngineError::MissingInput(handle.spec.input.clone()))?;
    if x.len() != handle.dimensions {
      return Err(EngineError::ShapeMismatch {
        name: handle.spec.input.clone(),
        expected: handle.dimensions,
        found: x.len(),
      });
    }
    Ok(handle.score(x))
  }

  fn unload(&mut self, handle: LinearModel) {
    debug!("Releasing linear model ({} classes)", handle.classes());
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ModelGuard;
  use tempfile::TempDir;

  fn write_model(dir: &TempDir, json: &str) -> std::path::PathBuf {
    let path = dir.path().join("model.json");
    std::fs::write(&path, json).unwrap();
    path
  }

  #[test]
  fn test_load_and_run() {
    let dir = TempDir::new().unwrap();
    let path = write_model(
      &dir,
      r#"{"weights": [[1.0, 0.0], [0.0, 2.0]], "bias": [0.5, 0.0]}"#,
    );

    let mut engine = LinearEngine::new();
    let mut guard = ModelGuard::load(&mut engine, &path, DeviceId::CPU).unwrap();
    assert_eq!(guard.first_input().unwrap(), ("features".to_string(), 2));
    assert_eq!(guard.first_output().unwrap(), ("scores".to_string(), 2));

    let inputs = Inputs::from([("features".to_string(), vec![1.0, 3.0])]);
    let scores = guard.run(&inputs, "scores").unwrap();
    assert_eq!(scores, vec![1.5, 6.0]);
  }

  #[test]
  fn test_run_rejects_bad_inputs() {
    let dir = TempDir::new().unwrap();
    let path = write_model(&dir, r#"{"output": "out", "weights": [[1.0], [2.0]]}"#);

    let mut engine = LinearEngine::new();
    let mut guard = ModelGuard::load(&mut engine, &path, DeviceId::AUTO).unwrap();

    let inputs = Inputs::from([("features".to_string(), vec![1.0, 3.0])]);
    assert!(matches!(
      guard.run(&inputs, "out"),
      Err(EngineError::ShapeMismatch { expected: 1, found: 2, .. })
    ));
    assert!(matches!(guard.run(&inputs, "scores"), Err(EngineError::UnknownOutput(_))));
    assert!(matches!(
      guard.run(&Inputs::new(), "out"),
      Err(EngineError::MissingInput(_))
    ));
  }

  #[test]
  fn test_load_rejects_ragged_weights() {
    let dir = TempDir::new().unwrap();
    let path = write_model(&dir, r#"{"weights": [[1.0, 2.0], [3.0]]}"#);

    let mut engine = LinearEngine::new();
    let err = engine.load(&path, DeviceId::CPU).unwrap_err();
    assert!(matches!(err, EngineError::Load { .. }));
    assert!(err.to_string().contains("weight row 1"));
  }

  #[test]
  fn test_load_missing_file() {
    let mut engine = LinearEngine::new();
    let err = engine.load(Path::new("/nonexistent/model.json"), DeviceId::CPU).unwrap_err();
    assert!(matches!(err, EngineError::Load { .. }));
  }
}
