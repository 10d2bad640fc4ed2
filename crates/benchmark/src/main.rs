//! Offline evaluation harness for binary classification models
//!
//! Two modes, selected by `/p` or `/e`:
//! - perf: synthetic load; latency distribution and memory deltas
//! - accuracy: labeled test set; confusion matrix, precision, recall, F1
//!
//! Slash flags (`/p /e /m /t /d`, any case) are accepted alongside the usual
//! `-p` / `--perf` forms. `--print-config` prints a commented config template.

use std::path::{Path, PathBuf};

use benchmark::{
  AccuracyEvaluation, PerfBenchmark, RunReport, read_dataset,
  reports::{RunResult, format_accuracy_summary, format_perf_summary},
  write_accuracy_reports, write_perf_reports,
};
use clap::{ArgGroup, Parser};
use engine::{LinearEngine, ProcessMemory};
use eval_core::{DeviceId, EvalConfig};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

/// Single-letter flags that may be written with a leading slash.
const SLASH_FLAGS: &[char] = &['p', 'e', 'm', 't', 'd'];

#[derive(Parser, Debug)]
#[command(name = "model-eval")]
#[command(about = "Benchmark and accuracy harness for binary classification models")]
#[command(version)]
#[command(group(ArgGroup::new("mode").required(true).args(["perf", "eval", "print_config"])))]
struct Cli {
  /// Run perf evaluation of model
  #[arg(short = 'p', long)]
  perf: bool,

  /// Evaluate model for precision, recall
  #[arg(short = 'e', long)]
  eval: bool,

  /// Print a default config file and exit
  #[arg(long)]
  print_config: bool,

  /// Model to evaluate
  #[arg(short = 'm', long = "model", value_name = "MODEL_PATH", required_unless_present = "print_config")]
  model: Option<PathBuf>,

  /// Test data file to run the model with
  #[arg(
    short = 't',
    long = "test-data",
    value_name = "TEST_DATA_PATH",
    required_unless_present = "print_config"
  )]
  test_data: Option<PathBuf>,

  /// Device: -1 for CPU, 0 or above for a GPU index. Defaults to auto (-4)
  #[arg(short = 'd', long = "device", allow_negative_numbers = true, default_value_t = DeviceId::AUTO)]
  device: DeviceId,

  /// Number of engine invocations in perf mode
  #[arg(long)]
  iterations: Option<usize>,

  /// Seed for synthetic perf inputs
  #[arg(long)]
  seed: Option<u64>,

  /// Directory for report files
  #[arg(long)]
  output_dir: Option<PathBuf>,

  /// Config file (defaults to ./model-eval.toml, then the user config)
  #[arg(long)]
  config: Option<PathBuf>,

  /// Also write a JSON report to this path
  #[arg(long)]
  json: Option<PathBuf>,

  /// Hide the progress bar
  #[arg(long)]
  no_progress: bool,

  /// Enable verbose logging
  #[arg(short, long)]
  verbose: bool,
}

/// Rewrite `/x` flags to `-x` so clap can parse them.
fn normalize_args(args: impl IntoIterator<Item = String>) -> Vec<String> {
  args
    .into_iter()
    .map(|arg| {
      let mut chars = arg.chars();
      match (chars.next(), chars.next(), chars.next()) {
        (Some('/'), Some(flag), None) if SLASH_FLAGS.contains(&flag.to_ascii_lowercase()) => {
          format!("-{}", flag.to_ascii_lowercase())
        }
        _ => arg,
      }
    })
    .collect()
}

fn load_config(cli: &Cli) -> anyhow::Result<EvalConfig> {
  let mut config = match &cli.config {
    Some(path) => EvalConfig::load_from(path)?,
    None => EvalConfig::load_for_dir(&std::env::current_dir()?),
  };

  if let Some(iterations) = cli.iterations {
    config.benchmark.iterations = iterations;
  }
  if let Some(seed) = cli.seed {
    config.benchmark.seed = Some(seed);
  }
  if let Some(dir) = &cli.output_dir {
    config.output.directory = dir.clone();
  }
  Ok(config)
}

fn main() -> anyhow::Result<()> {
  let cli = Cli::parse_from(normalize_args(std::env::args()));

  if cli.print_config {
    print!("{}", EvalConfig::generate_template());
    return Ok(());
  }

  // Setup logging
  let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
  let subscriber = FmtSubscriber::builder()
    .with_max_level(level)
    .with_target(false)
    .finish();
  tracing::subscriber::set_global_default(subscriber)?;

  let config = load_config(&cli)?;

  let (Some(model), Some(test_data)) = (cli.model.as_deref(), cli.test_data.as_deref()) else {
    anyhow::bail!("--model and --test-data are required");
  };

  if cli.perf {
    run_perf(&cli, &config, model)
  } else {
    run_accuracy(&cli, &config, model, test_data)
  }
}

fn run_perf(cli: &Cli, config: &EvalConfig, model: &Path) -> anyhow::Result<()> {
  let report = PerfBenchmark::new(&config.benchmark)
    .with_progress(!cli.no_progress)
    .run(&mut LinearEngine::new(), &mut ProcessMemory::new(), model, cli.device)?;

  println!();
  print!("{}", format_perf_summary(&report));

  for path in write_perf_reports(&report, &config.output)? {
    info!("Report: {}", path.display());
  }
  if let Some(json_path) = &cli.json {
    RunReport::new(model, cli.device, RunResult::Perf(report)).save(json_path)?;
    info!("JSON report: {}", json_path.display());
  }
  Ok(())
}

fn run_accuracy(cli: &Cli, config: &EvalConfig, model: &Path, test_data: &Path) -> anyhow::Result<()> {
  info!("Reading test data...");
  let lines = read_dataset(test_data)?;

  let report = AccuracyEvaluation::new(&config.benchmark)
    .with_progress(!cli.no_progress)
    .run(&mut LinearEngine::new(), model, cli.device, &lines)?;

  for path in write_accuracy_reports(&report, test_data, &config.output)? {
    info!("Report: {}", path.display());
  }

  println!();
  print!("{}", format_accuracy_summary(&report));

  if let Some(json_path) = &cli.json {
    RunReport::new(model, cli.device, RunResult::Accuracy(report)).save(json_path)?;
    info!("JSON report: {}", json_path.display());
  }
  Ok(())
}
