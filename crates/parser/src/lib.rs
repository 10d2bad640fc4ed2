//! Test record parsing for model evaluation
//!
//! Each record is one pipe-delimited line:
//! ```text
//! <label-segment>|<feature-segment>|...
//! L 0 1|features 3:1 17:0.5
//! L 1:1|features 2:5.0
//! ```
//! The label segment is either a fixed-offset sparse label (`L x:1`) or a one-hot
//! list (`L 0 1`). A feature segment of exactly `"F "` marks a row with no
//! features; it is skipped but still counted.

mod record;

pub use record::{FEATURES_GROUP, FeatureVector, SKIP_MARKER, UNRESOLVED_LABEL, argmax_label, parse_record};

use thiserror::Error;

/// Fatal record errors. Any of these aborts an evaluation run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
  #[error("invalid label: {0}")]
  InvalidLabel(char),

  #[error("feature index {index} out of range for input dimension {dimensions}")]
  IndexOutOfRange { index: i64, dimensions: usize },

  #[error("record has {found} segment(s), expected a label and a feature segment")]
  MissingSegment { found: usize },

  #[error("malformed token '{token}': {reason}")]
  MalformedToken { token: String, reason: &'static str },
}

pub type Result<T> = std::result::Result<T, ParseError>;
