//! Seams between the evaluation harness and the outside world.
//!
//! - [`InferenceEngine`]: black-box model runtime (load, shapes, run, unload)
//! - [`ModelGuard`]: owns a loaded model and unloads it on every exit path
//! - [`LinearEngine`]: JSON-described linear scorer so the harness runs standalone
//! - [`MemorySensor`]: process resident/virtual memory readings

mod guard;
mod linear;
mod memory;

use std::{
  collections::{BTreeMap, HashMap},
  path::{Path, PathBuf},
};

use eval_core::DeviceId;
use thiserror::Error;

pub use guard::ModelGuard;
pub use linear::{LinearEngine, LinearModel, LinearModelSpec};
pub use memory::{MemorySample, MemorySensor, ProcessMemory};

/// Node name to dimension. Ordered so "first node" is deterministic.
pub type Shape = BTreeMap<String, usize>;

/// Named input groups for one invocation.
pub type Inputs = HashMap<String, Vec<f32>>;

/// Failures surfaced by an inference engine. Never retried.
#[derive(Debug, Error)]
pub enum EngineError {
  #[error("failed to load model {path}: {reason}")]
  Load { path: PathBuf, reason: String },

  #[error("model invocation failed: {0}")]
  Invoke(String),

  #[error("unknown output node '{0}'")]
  UnknownOutput(String),

  #[error("missing input '{0}'")]
  MissingInput(String),

  #[error("input '{name}' has {found} values, expected {expected}")]
  ShapeMismatch { name: String, expected: usize, found: usize },

  #[error("model declares no {0} nodes")]
  NoNodes(&'static str),

  #[error("model handle already released")]
  NotLoaded,
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// External model runtime treated as a black box.
///
/// Drivers never call `load`/`unload` directly; they go through
/// [`ModelGuard`] so the handle is released even when a run fails.
pub trait InferenceEngine {
  type Handle;

  fn load(&mut self, model_path: &Path, device: DeviceId) -> Result<Self::Handle>;

  fn input_shape(&self, handle: &Self::Handle) -> Shape;

  fn output_shape(&self, handle: &Self::Handle) -> Shape;

  /// Evaluate one sample and return the scores of `output`.
  fn run(&mut self, handle: &Self::Handle, inputs: &Inputs, output: &str) -> Result<Vec<f32>>;

  fn unload(&mut self, handle: Self::Handle);
}
