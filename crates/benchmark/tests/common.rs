//! Common test utilities for driver integration tests
//!
//! A scripted inference engine and a deterministic memory sensor, so the
//! drivers can be exercised without a real model runtime.

use std::{collections::VecDeque, path::Path};

use engine::{EngineError, InferenceEngine, Inputs, MemorySample, MemorySensor, Shape};
use eval_core::DeviceId;

/// Engine that replays scripted score vectors and records what it was given.
#[allow(dead_code)]
pub struct StubEngine {
  pub input_name: String,
  pub dimensions: usize,
  /// Further declared inputs the stub never reads
  pub extra_inputs: Vec<(String, usize)>,
  pub output_name: String,
  /// Scores returned per call, in order; `default_scores` once exhausted
  pub responses: VecDeque<Vec<f32>>,
  pub default_scores: Vec<f32>,
  /// Fail the nth call (0-based)
  pub fail_on_call: Option<usize>,
  pub fail_load: bool,
  pub loads: usize,
  pub unloads: usize,
  pub calls: usize,
  pub last_device: Option<DeviceId>,
  pub seen_inputs: Vec<Vec<f32>>,
}

#[allow(dead_code)]
impl StubEngine {
  pub fn new(dimensions: usize) -> Self {
    Self {
      input_name: "features".to_string(),
      dimensions,
      extra_inputs: Vec::new(),
      output_name: "scores".to_string(),
      responses: VecDeque::new(),
      default_scores: vec![1.0, 0.0],
      fail_on_call: None,
      fail_load: false,
      loads: 0,
      unloads: 0,
      calls: 0,
      last_device: None,
      seen_inputs: Vec::new(),
    }
  }

  /// Queue one response per predicted label ('0' or '1').
  pub fn predicting(mut self, labels: &str) -> Self {
    self.responses = labels
      .chars()
      .map(|c| if c == '1' { vec![0.2, 0.8] } else { vec![0.8, 0.2] })
      .collect();
    self
  }
}

impl InferenceEngine for StubEngine {
  type Handle = ();

  fn load(&mut self, model_path: &Path, device: DeviceId) -> Result<(), EngineError> {
    if self.fail_load {
      return Err(EngineError::Load {
        path: model_path.to_path_buf(),
        reason: "stub refused to load".to_string(),
      });
    }
    self.loads += 1;
    self.last_device = Some(device);
    Ok(())
  }

  fn input_shape(&self, _handle: &()) -> Shape {
    let mut shape = Shape::from([(self.input_name.clone(), self.dimensions)]);
    shape.extend(self.extra_inputs.iter().cloned());
    shape
  }

  fn output_shape(&self, _handle: &()) -> Shape {
    Shape::from([(self.output_name.clone(), 2)])
  }

  fn run(&mut self, _handle: &(), inputs: &Inputs, output: &str) -> Result<Vec<f32>, EngineError> {
    let call = self.calls;
    self.calls += 1;

    if self.fail_on_call == Some(call) {
      return Err(EngineError::Invoke(format!("stub failure on call {call}")));
    }
    if output != self.output_name {
      return Err(EngineError::UnknownOutput(output.to_string()));
    }
    let values = inputs
      .get(&self.input_name)
      .ok_or_else(|| EngineError::MissingInput(self.input_name.clone()))?;
    self.seen_inputs.push(values.clone());

    Ok(self.responses.pop_front().unwrap_or_else(|| self.default_scores.clone()))
  }

  fn unload(&mut self, _handle: ()) {
    self.unloads += 1;
  }
}

/// Memory sensor that grows by a fixed step on every reading.
#[allow(dead_code)]
pub struct StepSensor {
  pub current: MemorySample,
  pub step: MemorySample,
  pub readings: usize,
}

#[allow(dead_code)]
impl StepSensor {
  pub fn new(resident_step: i64, virtual_step: i64) -> Self {
    Self {
      current: MemorySample::new(10_000_000, 50_000_000),
      step: MemorySample::new(resident_step, virtual_step),
      readings: 0,
    }
  }
}

impl MemorySensor for StepSensor {
  fn sample(&mut self) -> MemorySample {
    let reading = self.current;
    self.current = MemorySample::new(
      self.current.resident_bytes + self.step.resident_bytes,
      self.current.virtual_bytes + self.step.virtual_bytes,
    );
    self.readings += 1;
    reading
  }
}

/// Lines with the given ground-truth labels, one-hot encoded.
#[allow(dead_code)]
pub fn labeled_lines(labels: &str) -> Vec<String> {
  labels
    .chars()
    .enumerate()
    .map(|(i, c)| {
      let one_hot = if c == '1' { "0 1" } else { "1 0" };
      format!("L {}|features {}:1.5", one_hot, i % 4)
    })
    .collect()
}
