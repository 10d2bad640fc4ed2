//! Accuracy metrics for binary classification.

use parser::FeatureVector;
use serde::{Deserialize, Serialize};

const POSITIVE: char = '1';
const NEGATIVE: char = '0';

/// Confusion matrix cells accumulated over one dataset pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionCounts {
  pub true_positive: i64,
  pub true_negative: i64,
  pub false_positive: i64,
  pub false_negative: i64,
  /// Records excluded by the feature-absent marker
  pub skipped: i64,
  /// Records whose prediction fell outside the binary classes
  #[serde(default)]
  pub unscored: i64,
}

impl ConfusionCounts {
  /// Scored records in the four cells.
  pub fn total(&self) -> i64 {
    self.true_positive + self.true_negative + self.false_positive + self.false_negative
  }
}

fn ratio(numerator: i64, denominator: i64) -> f64 {
  if denominator == 0 {
    0.0
  } else {
    numerator as f64 / denominator as f64
  }
}

/// Rates derived from [`ConfusionCounts`]. Every zero denominator yields 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
  /// tp / (tp + fp)
  pub precision: f64,
  /// tp / (tp + fn)
  pub recall: f64,
  /// (tp + tn) / total
  pub accuracy: f64,
  /// (fp + fn) / total
  pub error_rate: f64,
  /// Harmonic mean of precision and recall, 0 when both are 0
  pub f1: f64,
  /// tp / positives
  pub true_positive_rate: f64,
  /// fp / negatives
  pub false_positive_rate: f64,
  /// tp / (tp + fp), same as precision
  pub positive_predictive_value: f64,
  /// fn / (fn + tn)
  pub false_omission_rate: f64,
}

impl ClassificationMetrics {
  pub fn from_counts(counts: &ConfusionCounts, positive: i64, negative: i64) -> Self {
    let tp = counts.true_positive;
    let tn = counts.true_negative;
    let fp = counts.false_positive;
    let fn_ = counts.false_negative;
    let total = counts.total();

    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fn_);
    let f1 = if precision + recall == 0.0 {
      0.0
    } else {
      2.0 * precision * recall / (precision + recall)
    };

    Self {
      precision,
      recall,
      accuracy: ratio(tp + tn, total),
      error_rate: ratio(fp + fn_, total),
      f1,
      true_positive_rate: ratio(tp, positive),
      false_positive_rate: ratio(fp, negative),
      positive_predictive_value: precision,
      false_omission_rate: ratio(fn_, fn_ + tn),
    }
  }
}

/// Where a single record landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Skipped,
  TruePositive,
  TrueNegative,
  FalsePositive,
  FalseNegative,
  /// Label or prediction outside the binary classes
  Unscored,
}

/// Correctness report for one accuracy run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccuracyReport {
  /// All records seen, skipped included
  pub records: i64,
  pub counts: ConfusionCounts,
  /// Non-skipped records labeled positive
  pub positive: i64,
  /// Non-skipped records labeled negative
  pub negative: i64,
  pub metrics: ClassificationMetrics,
  /// Original lines of false positives (true 0, predicted 1)
  #[serde(skip)]
  pub false_positives: Vec<String>,
  /// Original lines of false negatives (true 1, predicted 0)
  #[serde(skip)]
  pub false_negatives: Vec<String>,
}

/// Streaming confusion matrix builder.
#[derive(Debug, Default)]
pub struct ConfusionAccumulator {
  records: i64,
  counts: ConfusionCounts,
  positive: i64,
  negative: i64,
  unscored_positive: i64,
  unscored_negative: i64,
  false_positives: Vec<String>,
  false_negatives: Vec<String>,
}

impl ConfusionAccumulator {
  pub fn new() -> Self {
    Self::default()
  }

  /// Count one (label, prediction, skipped) observation.
  pub fn record(&mut self, label: char, predicted: Option<char>, skipped: bool) -> Outcome {
    self.records += 1;
    if skipped {
      self.counts.skipped += 1;
      return Outcome::Skipped;
    }

    // Class totals come from ground truth alone
    match label {
      POSITIVE => self.positive += 1,
      NEGATIVE => self.negative += 1,
      _ => {}
    }

    let outcome = match (label, predicted) {
      (POSITIVE, Some(POSITIVE)) => Outcome::TruePositive,
      (NEGATIVE, Some(NEGATIVE)) => Outcome::TrueNegative,
      (NEGATIVE, Some(POSITIVE)) => Outcome::FalsePositive,
      (POSITIVE, Some(NEGATIVE)) => Outcome::FalseNegative,
      _ => Outcome::Unscored,
    };

    match outcome {
      Outcome::TruePositive => self.counts.true_positive += 1,
      Outcome::TrueNegative => self.counts.true_negative += 1,
      Outcome::FalsePositive => self.counts.false_positive += 1,
      Outcome::FalseNegative => self.counts.false_negative += 1,
      Outcome::Unscored => {
        self.counts.unscored += 1;
        match label {
          POSITIVE => self.unscored_positive += 1,
          NEGATIVE => self.unscored_negative += 1,
          _ => {}
        }
      }
      Outcome::Skipped => {}
    }
    outcome
  }

  /// Count a decoded vector, keeping its original line if misclassified.
  pub fn record_vector(&mut self, vector: &FeatureVector) -> Outcome {
    let outcome = self.record(vector.label, vector.output_label, vector.skipped);
    match outcome {
      Outcome::FalsePositive => self.false_positives.push(vector.original.clone()),
      Outcome::FalseNegative => self.false_negatives.push(vector.original.clone()),
      _ => {}
    }
    outcome
  }

  pub fn finish(self) -> AccuracyReport {
    debug_assert_eq!(
      self.counts.true_positive + self.counts.false_negative + self.unscored_positive,
      self.positive,
      "tp + fn + unscored positives must equal the positive count"
    );
    debug_assert_eq!(
      self.counts.false_positive + self.counts.true_negative + self.unscored_negative,
      self.negative,
      "fp + tn + unscored negatives must equal the negative count"
    );

    AccuracyReport {
      records: self.records,
      counts: self.counts,
      positive: self.positive,
      negative: self.negative,
      metrics: ClassificationMetrics::from_counts(&self.counts, self.positive, self.negative),
      false_positives: self.false_positives,
      false_negatives: self.false_negatives,
    }
  }
}
