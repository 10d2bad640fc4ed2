//! Throughput/latency/memory benchmark under synthetic load.
//!
//! Loads the model once, then invokes it `iterations` times with random
//! inputs of the declared input dimension. Only the engine call itself is
//! timed, and each memory delta straddles just that call.

use std::{path::Path, time::Instant};

use engine::{InferenceEngine, Inputs, MemorySample, MemorySensor, ModelGuard};
use eval_core::{BenchmarkConfig, DeviceId};
use parser::FEATURES_GROUP;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
  BenchmarkError, Result,
  metrics::{LatencyTracker, MemoryAverage, MemoryTracker, SummaryStats},
  progress::Progress,
};

/// Upper bound (exclusive) of synthetic input values.
const INPUT_VALUE_RANGE: u32 = 255;

/// Result of one perf run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerfReport {
  /// Model file name
  pub model: String,
  pub device: DeviceId,
  pub iterations: usize,
  /// Declared input dimension the synthetic vectors were drawn at
  pub input_dimension: usize,
  /// Per-call latency in microseconds
  pub latency: SummaryStats,
  /// Raw per-call latencies in microseconds, in call order
  #[serde(skip)]
  pub latency_samples_us: Vec<u64>,
  /// Memory change caused by loading the model
  pub init_memory: MemorySample,
  /// Memory change between end of load and end of the call loop
  pub eval_memory: MemorySample,
  /// Memory change over the whole run
  pub total_memory: MemorySample,
  /// Mean memory change straddling a single call
  pub avg_call_memory: MemoryAverage,
  /// Wall time of the whole run in milliseconds
  pub total_time_ms: u64,
}

/// Benchmark driver for synthetic load.
#[derive(Debug, Clone)]
pub struct PerfBenchmark {
  iterations: usize,
  progress_interval: usize,
  seed: Option<u64>,
  show_progress: bool,
}

impl PerfBenchmark {
  pub fn new(config: &BenchmarkConfig) -> Self {
    Self {
      iterations: config.iterations,
      progress_interval: config.progress_interval,
      seed: config.seed,
      show_progress: true,
    }
  }

  pub fn with_iterations(mut self, iterations: usize) -> Self {
    self.iterations = iterations;
    self
  }

  pub fn with_seed(mut self, seed: u64) -> Self {
    self.seed = Some(seed);
    self
  }

  pub fn with_progress(mut self, show: bool) -> Self {
    self.show_progress = show;
    self
  }

  pub fn run<E, M>(&self, engine: &mut E, sensor: &mut M, model_path: &Path, device: DeviceId) -> Result<PerfReport>
  where
    E: InferenceEngine,
    M: MemorySensor,
  {
    if self.iterations == 0 {
      return Err(BenchmarkError::NoIterations);
    }

    let total_timer = Instant::now();
    let mut rng = match self.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };

    let before = sensor.sample();
    info!("Loading model {}...", model_path.display());
    let mut model = ModelGuard::load(engine, model_path, device)?;
    let after_load = sensor.sample();
    let init_memory = after_load - before;
    info!(
      "Init memory: {:.4} MiB resident, {:.4} MiB virtual",
      eval_core::to_mib(init_memory.resident_bytes as f64),
      eval_core::to_mib(init_memory.virtual_bytes as f64)
    );

    let (input_name, input_dimension) = model.preferred_input(FEATURES_GROUP)?;
    let (output_name, _) = model.first_output()?;
    info!("Input size: {}", input_dimension);
    debug!("Synthetic input '{}', reading output '{}'", input_name, output_name);

    let mut inputs = Inputs::from([(input_name.clone(), vec![0.0f32; input_dimension])]);
    let mut latency = LatencyTracker::with_capacity(self.iterations);
    let mut memory = MemoryTracker::new();
    let progress = Progress::new(self.iterations, self.progress_interval, self.show_progress);

    info!("Evaluating {} synthetic samples...", self.iterations);
    for i in 0..self.iterations {
      progress.update(i);

      if let Some(values) = inputs.get_mut(&input_name) {
        for value in values.iter_mut() {
          *value = rng.gen_range(0..INPUT_VALUE_RANGE) as f32;
        }
      }

      let call_before = sensor.sample();
      let timer = Instant::now();
      model.run(&inputs, &output_name)?;
      latency.record(timer.elapsed());
      let call_after = sensor.sample();

      memory.record(call_after - call_before);
    }
    progress.finish("done");

    let end = sensor.sample();
    drop(model);

    let stats = latency.stats()?;
    let model_name = model_path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_else(|| model_path.display().to_string());

    Ok(PerfReport {
      model: model_name,
      device,
      iterations: self.iterations,
      input_dimension,
      latency: stats,
      latency_samples_us: latency.into_samples(),
      init_memory,
      eval_memory: end - after_load,
      total_memory: end - before,
      avg_call_memory: memory.average(),
      total_time_ms: total_timer.elapsed().as_millis() as u64,
    })
  }
}
