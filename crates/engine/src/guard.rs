use std::path::Path;

use eval_core::DeviceId;
use tracing::debug;

use crate::{EngineError, InferenceEngine, Inputs, Result, Shape};

/// A loaded model, exclusively owned by the driving loop.
///
/// The handle is released in `Drop`, so early returns and `?` propagation
/// unload the model before the error leaves the driver.
pub struct ModelGuard<'e, E: InferenceEngine> {
  engine: &'e mut E,
  handle: Option<E::Handle>,
}

impl<'e, E: InferenceEngine> ModelGuard<'e, E> {
  pub fn load(engine: &'e mut E, model_path: &Path, device: DeviceId) -> Result<Self> {
    debug!("Loading model {} on device {}", model_path.display(), device);
    let handle = engine.load(model_path, device)?;
    Ok(Self {
      engine,
      handle: Some(handle),
    })
  }

  pub fn input_shape(&self) -> Shape {
    self
      .handle
      .as_ref()
      .map(|handle| self.engine.input_shape(handle))
      .unwrap_or_default()
  }

  pub fn output_shape(&self) -> Shape {
    self
      .handle
      .as_ref()
      .map(|handle| self.engine.output_shape(handle))
      .unwrap_or_default()
  }

  /// The input called `name` if the model declares one, else the first input.
  pub fn preferred_input(&self, name: &str) -> Result<(String, usize)> {
    match self.input_shape().get(name) {
      Some(&dimension) => Ok((name.to_string(), dimension)),
      None => self.first_input(),
    }
  }

  /// First declared input node and its dimension.
  pub fn first_input(&self) -> Result<(String, usize)> {
    self
      .input_shape()
      .into_iter()
      .next()
      .ok_or(EngineError::NoNodes("input"))
  }

  /// First declared output node and its dimension.
  pub fn first_output(&self) -> Result<(String, usize)> {
    self
      .output_shape()
      .into_iter()
      .next()
      .ok_or(EngineError::NoNodes("output"))
  }

  pub fn run(&mut self, inputs: &Inputs, output: &str) -> Result<Vec<f32>> {
    let handle = self.handle.as_ref().ok_or(EngineError::NotLoaded)?;
    self.engine.run(handle, inputs, output)
  }
}

impl<E: InferenceEngine> Drop for ModelGuard<'_, E> {
  fn drop(&mut self) {
    if let Some(handle) = self.handle.take() {
      self.engine.unload(handle);
      debug!("Model unloaded");
    }
  }
}
