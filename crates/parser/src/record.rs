use std::collections::HashMap;

use crate::{ParseError, Result};

/// Name of the single feature group fed to the model.
pub const FEATURES_GROUP: &str = "features";

/// Feature segment value that flags a row as having no features.
pub const SKIP_MARKER: &str = "F ";

/// Label value before resolution.
pub const UNRESOLVED_LABEL: char = '~';

/// One test-set example.
///
/// Created by [`parse_record`], then mutated exactly once by
/// [`FeatureVector::decode_output`] which drops the features.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
  /// Raw source line, kept for misclassification dumps
  pub original: String,
  /// Ground truth, `'0'` or `'1'` once resolved
  pub label: char,
  /// Named feature groups; empty for skipped rows and after decoding
  pub features: HashMap<String, Vec<f32>>,
  /// Row carried the feature-absent marker
  pub skipped: bool,
  /// Raw model scores, empty until inference
  pub output: Vec<f32>,
  /// Argmax-decoded prediction, set after inference
  pub output_label: Option<char>,
}

impl FeatureVector {
  fn new(original: &str) -> Self {
    Self {
      original: original.to_string(),
      label: UNRESOLVED_LABEL,
      features: HashMap::new(),
      skipped: false,
      output: Vec::new(),
      output_label: None,
    }
  }

  /// Store model scores, decode the predicted label and release the features.
  pub fn decode_output(&mut self, scores: Vec<f32>) -> Option<char> {
    self.output_label = argmax_label(&scores);
    self.output = scores;
    self.features = HashMap::new();
    self.output_label
  }
}

/// Index of the first maximal score, rendered as a decimal digit.
///
/// Indices above 9 render as their leading digit. Returns `None` for an empty
/// score vector.
pub fn argmax_label(scores: &[f32]) -> Option<char> {
  let mut best: Option<(usize, f32)> = None;
  for (idx, &score) in scores.iter().enumerate() {
    match best {
      Some((_, max)) if score <= max || score.is_nan() => {}
      _ => best = Some((idx, score)),
    }
  }
  best.and_then(|(idx, _)| idx.to_string().chars().next())
}

/// Parse one raw line into a [`FeatureVector`] with a dense feature group of
/// length `dimensions`.
pub fn parse_record(line: &str, dimensions: usize) -> Result<FeatureVector> {
  let mut vector = FeatureVector::new(line);

  let segments: Vec<&str> = line.split('|').filter(|s| !s.is_empty()).collect();
  if segments.len() < 2 {
    return Err(ParseError::MissingSegment { found: segments.len() });
  }

  if segments[1] == SKIP_MARKER {
    vector.skipped = true;
    return Ok(vector);
  }

  let label = resolve_label(segments[0])?;
  vector.label = label;
  if label != '0' && label != '1' {
    return Err(ParseError::InvalidLabel(label));
  }

  let dense = expand_features(segments[1], dimensions)?;
  vector.features.insert(FEATURES_GROUP.to_string(), dense);

  Ok(vector)
}

fn resolve_label(segment: &str) -> Result<char> {
  if segment.contains(':') {
    // L x:1 - label sits at a fixed offset after the tag
    return segment.chars().nth(2).ok_or_else(|| ParseError::MalformedToken {
      token: segment.to_string(),
      reason: "sparse label segment too short",
    });
  }

  // L 0 1 - one-hot list after the tag
  let one_hot = segment
    .split_whitespace()
    .skip(1)
    .map(|token| {
      token.parse::<i64>().map_err(|_| ParseError::MalformedToken {
        token: token.to_string(),
        reason: "one-hot label entry is not an integer",
      })
    })
    .collect::<Result<Vec<_>>>()?;

  let mut best: Option<(usize, i64)> = None;
  for (idx, value) in one_hot.into_iter().enumerate() {
    if best.is_none_or(|(_, max)| value > max) {
      best = Some((idx, value));
    }
  }

  best
    .and_then(|(idx, _)| idx.to_string().chars().next())
    .ok_or_else(|| ParseError::MalformedToken {
      token: segment.to_string(),
      reason: "empty one-hot label",
    })
}

fn expand_features(segment: &str, dimensions: usize) -> Result<Vec<f32>> {
  let mut dense = vec![0.0f32; dimensions];

  for token in segment.split_whitespace().skip(1) {
    let (index, value) = token.split_once(':').ok_or_else(|| ParseError::MalformedToken {
      token: token.to_string(),
      reason: "expected <index>:<value>",
    })?;

    let index = index.parse::<i64>().map_err(|_| ParseError::MalformedToken {
      token: token.to_string(),
      reason: "feature index is not an integer",
    })?;
    let value = value.parse::<f32>().map_err(|_| ParseError::MalformedToken {
      token: token.to_string(),
      reason: "feature value is not a number",
    })?;

    if index < 0 || index as u64 >= dimensions as u64 {
      return Err(ParseError::IndexOutOfRange { index, dimensions });
    }
    dense[index as usize] = value;
  }

  Ok(dense)
}
