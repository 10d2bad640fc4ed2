//! End-to-end runs against the bundled linear engine

use benchmark::{AccuracyEvaluation, PerfBenchmark, read_dataset};
use engine::{LinearEngine, ProcessMemory};
use eval_core::{BenchmarkConfig, DeviceId};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const MODEL: &str = r#"{"weights": [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]], "bias": [0.0, 0.0]}"#;

const TEST_DATA: &str = concat!(
  "L 0 1|features 1:1\n",
  "L 1 0|features 0:1\n",
  "L 1 0|features 1:2\n",
  "L 0 1|F \n",
  "L 1:1|features 0:3 2:9\n",
);

#[test]
fn test_accuracy_with_linear_model() {
  let dir = TempDir::new().unwrap();
  let model = dir.path().join("model.json");
  let data = dir.path().join("test.txt");
  std::fs::write(&model, MODEL).unwrap();
  std::fs::write(&data, TEST_DATA).unwrap();

  let lines = read_dataset(&data).unwrap();
  let report = AccuracyEvaluation::new(&BenchmarkConfig::default())
    .with_progress(false)
    .run(&mut LinearEngine::new(), &model, DeviceId::CPU, &lines)
    .unwrap();

  assert_eq!(report.records, 5);
  assert_eq!(report.counts.skipped, 1);
  assert_eq!(report.counts.true_positive, 1);
  assert_eq!(report.counts.true_negative, 1);
  assert_eq!(report.counts.false_positive, 1);
  assert_eq!(report.counts.false_negative, 1);
  assert_eq!(report.false_positives, vec!["L 1 0|features 1:2".to_string()]);
  assert_eq!(report.false_negatives, vec!["L 1:1|features 0:3 2:9".to_string()]);
}

#[test]
fn test_perf_with_linear_model() {
  let dir = TempDir::new().unwrap();
  let model = dir.path().join("model.json");
  std::fs::write(&model, MODEL).unwrap();

  let report = PerfBenchmark::new(&BenchmarkConfig::default())
    .with_iterations(50)
    .with_seed(42)
    .with_progress(false)
    .run(&mut LinearEngine::new(), &mut ProcessMemory::new(), &model, DeviceId::AUTO)
    .unwrap();

  assert_eq!(report.input_dimension, 3);
  assert_eq!(report.latency.count, 50);
  assert!(report.latency.min <= report.latency.p50);
  assert!(report.latency.p50 <= report.latency.p99);
  assert!(report.latency.p99 <= report.latency.max);
}

#[test]
fn test_missing_model_file() {
  let dir = TempDir::new().unwrap();
  let result = AccuracyEvaluation::new(&BenchmarkConfig::default())
    .with_progress(false)
    .run(
      &mut LinearEngine::new(),
      &dir.path().join("absent.json"),
      DeviceId::CPU,
      &["L 0 1|features 0:1"],
    );
  assert!(matches!(
    result,
    Err(benchmark::BenchmarkError::Engine(engine::EngineError::Load { .. }))
  ));
}
