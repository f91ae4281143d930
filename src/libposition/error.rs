// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at

//     http://www.apache.org/licenses/LICENSE-2.0

// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Errors raised by range construction and by the list operations.

use thiserror::Error;

/// Raised when a range would be negative, descending, or end beyond
/// [`MAXIMUM_SIZE`](crate::range::MAXIMUM_SIZE).
///
/// Carries the offending bounds for diagnostics. The fields are signed
/// because `translate` can push a range below zero before the error is
/// detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("position range out of bounds: {from},{to}")]
pub struct RangeError {
  pub from: i64,
  pub to: i64,
}

/// Raised when a string does not match the range or list grammar, when
/// insertion or alignment is called with mismatched total sizes, or when
/// extraction is requested past the end of the source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
  /// The string is not of the form `<begin>,<end>`.
  #[error("invalid position range string: {0:?}")]
  InvalidRange(String),
  /// The string is not a `:`-joined sequence of ranges.
  #[error("invalid position range list string: {0:?}")]
  InvalidList(String),
  /// The string parsed, but the bounds are invalid.
  #[error(transparent)]
  Range(#[from] RangeError),
  /// Two lists that must cover the same total size do not.
  #[error("range sizes differ: {left} versus {right}")]
  SizeMismatch { left: u64, right: u64 },
  /// A range points past the end of the text it is applied to.
  #[error("range end {end} is past the end of the text ({len} characters)")]
  PastEndOfText { end: u64, len: u64 },
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn range_error_carries_bounds() {
    let err = RangeError { from: 5, to: 2 };
    assert_eq!(err.to_string(), "position range out of bounds: 5,2");
  }

  #[test]
  fn parse_error_wraps_range_error() {
    let err: ParseError = RangeError { from: 4, to: 2 }.into();
    assert_eq!(err.to_string(), "position range out of bounds: 4,2");
  }

  #[test]
  fn size_mismatch_names_both_sizes() {
    let err = ParseError::SizeMismatch { left: 10, right: 12 };
    assert_eq!(err.to_string(), "range sizes differ: 10 versus 12");
  }
}
