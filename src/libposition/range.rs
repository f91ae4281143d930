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

//! Half-open attributed ranges of positions.
//!
//! A [`PositionRange`] models the span `[begin, end)` over non-negative
//! positions, conceptually character offsets into a piece of text, plus an
//! open-ended attribute set. Ranges can be compared, sorted, and parsed from
//! and to strings. Most interesting things happen to them inside a
//! [`PositionRangeList`](crate::range_list::PositionRangeList).

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::attributes::{AttrValue, Attributes};
use crate::error::{ParseError, RangeError};

/// A position in the shared coordinate space.
pub type Position = u32;

/// The largest admissible `end` of a range.
pub const MAXIMUM_SIZE: Position = 1 << 31;

/// A half-open range `[begin, end)` with an attribute set.
///
/// The bounds satisfy `begin <= end <= MAXIMUM_SIZE`; the size `end - begin`
/// may be zero. Ordering and equality look at the bounds only: ranges are
/// compared by `begin` first and by `end` on a tie, independently of their
/// attributes. Attribute comparison is the separate
/// [`attr_eq`](PositionRange::attr_eq) predicate.
#[derive(Debug, Clone)]
pub struct PositionRange {
  begin: Position,
  end: Position,
  attributes: Attributes,
}

impl PositionRange {
  /// Creates a new range without attributes.
  ///
  /// Fails with [`RangeError`] if the bounds are descending or if `end`
  /// exceeds [`MAXIMUM_SIZE`].
  pub fn new(begin: Position, end: Position) -> Result<PositionRange, RangeError> {
    PositionRange::with_attributes(begin, end, Attributes::new())
  }

  /// Creates a new range carrying the given attributes.
  pub fn with_attributes(
    begin: Position,
    end: Position,
    attributes: Attributes,
  ) -> Result<PositionRange, RangeError> {
    if begin > end || end > MAXIMUM_SIZE {
      return Err(RangeError {
        from: begin as i64,
        to: end as i64,
      });
    }
    Ok(PositionRange {
      begin,
      end,
      attributes,
    })
  }

  /// Parses a range from a string of the form `<begin>,<end>`, attaching the
  /// given attributes to the result.
  ///
  /// Both fields must be non-negative decimal integers and `end` is
  /// exclusive. Any other shape fails with [`ParseError`].
  pub fn from_str_with(s: &str, attributes: Attributes) -> Result<PositionRange, ParseError> {
    let (begin, end) = parse_bounds(s)?;
    if end > MAXIMUM_SIZE as u64 || begin > end {
      return Err(ParseError::Range(RangeError {
        from: begin as i64,
        to: end as i64,
      }));
    }
    Ok(PositionRange {
      begin: begin as Position,
      end: end as Position,
      attributes,
    })
  }

  pub fn begin(&self) -> Position {
    self.begin
  }

  pub fn end(&self) -> Position {
    self.end
  }

  /// The number of positions covered, `end - begin`. May be zero.
  pub fn size(&self) -> u64 {
    (self.end - self.begin) as u64
  }

  pub fn attributes(&self) -> &Attributes {
    &self.attributes
  }

  /// Reads a single attribute. Unset names are absent, never an error.
  pub fn attr(&self, name: &str) -> Option<&AttrValue> {
    self.attributes.get(name)
  }

  /// Attaches an attribute. Any name is accepted without prior declaration.
  pub fn set_attr<N, V>(&mut self, name: N, value: V)
  where
    N: Into<String>,
    V: Into<AttrValue>,
  {
    self.attributes.set(name, value);
  }

  /// Removes an attribute, returning its previous value if it was set.
  pub fn unset_attr(&mut self, name: &str) -> Option<AttrValue> {
    self.attributes.unset(name)
  }

  /// Builder form of [`set_attr`](PositionRange::set_attr).
  pub fn with_attr<N, V>(mut self, name: N, value: V) -> PositionRange
  where
    N: Into<String>,
    V: Into<AttrValue>,
  {
    self.set_attr(name, value);
    self
  }

  /// Duplicates this range with new bounds, carrying all attributes over
  /// verbatim.
  ///
  /// Every operation that splits or shifts a range goes through this, so
  /// attribute identity survives fragmentation.
  pub fn with_bounds(
    &self,
    begin: Position,
    end: Position,
  ) -> Result<PositionRange, RangeError> {
    if begin > end || end > MAXIMUM_SIZE {
      return Err(RangeError {
        from: begin as i64,
        to: end as i64,
      });
    }
    Ok(self.respan(begin, end))
  }

  /// Duplicate with new bounds that are already known to be valid.
  pub(crate) fn respan(&self, begin: Position, end: Position) -> PositionRange {
    debug_assert!(begin <= end && end <= MAXIMUM_SIZE);
    PositionRange {
      begin,
      end,
      attributes: self.attributes.clone(),
    }
  }

  /// A fresh attribute-less range with bounds already known to be valid.
  pub(crate) fn bare(begin: Position, end: Position) -> PositionRange {
    debug_assert!(begin <= end && end <= MAXIMUM_SIZE);
    PositionRange {
      begin,
      end,
      attributes: Attributes::new(),
    }
  }

  /// Duplicate shifted along the coordinate axis. The caller guarantees the
  /// shifted bounds stay within `[0, MAXIMUM_SIZE]`.
  pub(crate) fn shifted(&self, delta: i64) -> PositionRange {
    let begin = self.begin as i64 + delta;
    let end = self.end as i64 + delta;
    debug_assert!(begin >= 0 && end <= MAXIMUM_SIZE as i64);
    PositionRange {
      begin: begin as Position,
      end: end as Position,
      attributes: self.attributes.clone(),
    }
  }

  /// True iff the two spans intersect as half-open ranges.
  pub fn overlaps(&self, other: &PositionRange) -> bool {
    self.begin < other.end && other.begin < self.end
  }

  /// True iff every attribute name present on either range has the same
  /// value on both. Absence counts, so an attribute set on one side and
  /// unset on the other makes the ranges attribute-unequal.
  pub fn attr_eq(&self, other: &PositionRange) -> bool {
    self.attributes == other.attributes
  }

  /// Removes the overlap with `other` from this range.
  ///
  /// Returns the range unchanged if the two do not overlap, `None` if
  /// `other` fully covers it, and the surviving one-sided fragment if
  /// `other` overlaps one side. When `other` lies strictly inside this
  /// range, leaving a fragment on both sides, the left fragment
  /// `[begin, other.begin)` is returned; callers needing both fragments
  /// use the list-level subtraction, which splits properly.
  pub fn subtract(&self, other: &PositionRange) -> Option<PositionRange> {
    if !self.overlaps(other) {
      return Some(self.clone());
    }
    if other.begin <= self.begin && other.end >= self.end {
      return None;
    }
    if other.begin <= self.begin {
      return Some(self.respan(other.end, self.end));
    }
    Some(self.respan(self.begin, other.begin))
  }
}

impl fmt::Display for PositionRange {
  fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
    write!(formatter, "{},{}", self.begin, self.end)
  }
}

impl FromStr for PositionRange {
  type Err = ParseError;

  fn from_str(s: &str) -> Result<PositionRange, ParseError> {
    PositionRange::from_str_with(s, Attributes::new())
  }
}

impl PartialEq for PositionRange {
  fn eq(&self, other: &PositionRange) -> bool {
    self.begin == other.begin && self.end == other.end
  }
}

impl Eq for PositionRange {}

impl PartialOrd for PositionRange {
  fn partial_cmp(&self, other: &PositionRange) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for PositionRange {
  fn cmp(&self, other: &PositionRange) -> Ordering {
    self
      .begin
      .cmp(&other.begin)
      .then(self.end.cmp(&other.end))
  }
}

fn parse_bounds(s: &str) -> Result<(u64, u64), ParseError> {
  let malformed = || ParseError::InvalidRange(s.to_string());
  let mut fields = s.split(',');
  match (fields.next(), fields.next(), fields.next()) {
    (Some(begin), Some(end), None) if is_digits(begin) && is_digits(end) => {
      let begin = begin.parse::<u64>().map_err(|_| malformed())?;
      let end = end.parse::<u64>().map_err(|_| malformed())?;
      Ok((begin, end))
    }
    _ => Err(malformed()),
  }
}

fn is_digits(s: &str) -> bool {
  !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parsing() {
    assert_eq!(
      PositionRange::new(1, 4).unwrap(),
      "1,4".parse::<PositionRange>().unwrap()
    );
    assert_eq!("1,3", PositionRange::new(1, 3).unwrap().to_string());
  }

  #[test]
  fn parsing_rejects_malformed_strings() {
    for s in &["4,,2", "", "4", ",4", "4,", "1,2,3", "1, 2", " 1,2", "-1,3", "a,b", "1;2"] {
      assert!(
        s.parse::<PositionRange>().is_err(),
        "{:?} should not parse",
        s
      );
    }
  }

  #[test]
  fn parsing_rejects_invalid_bounds() {
    match "4,2".parse::<PositionRange>() {
      Err(ParseError::Range(err)) => assert_eq!(err, RangeError { from: 4, to: 2 }),
      other => panic!("expected a range error, got {:?}", other),
    }
    assert!("5,2147483649".parse::<PositionRange>().is_err());
  }

  #[test]
  fn construction_checks_bounds() {
    assert!(PositionRange::new(4, 2).is_err());
    assert!(PositionRange::new(0, MAXIMUM_SIZE).is_ok());
    assert!(PositionRange::new(0, MAXIMUM_SIZE + 1).is_err());
    assert_eq!(
      PositionRange::new(4, 2).unwrap_err(),
      RangeError { from: 4, to: 2 }
    );
  }

  #[test]
  fn size_is_end_minus_begin() {
    assert_eq!(3, PositionRange::new(1, 4).unwrap().size());
    assert_eq!(0, PositionRange::new(7, 7).unwrap().size());
  }

  #[test]
  fn comparison_is_two_stage_and_positional() {
    let p = |b, e| PositionRange::new(b, e).unwrap();
    assert!(p(1, 3) < p(2, 3));
    assert!(p(1, 3) > p(1, 2));
    assert!(p(1, 3) == p(1, 3));
    // Attributes do not take part in ordering or equality.
    assert!(p(1, 3) == p(1, 3).with_attr("link", "aa"));
  }

  #[test]
  fn attribute_equality() {
    let left = PositionRange::new(1, 3).unwrap().with_attr("link", "aa");
    let mut right = PositionRange::new(7, 13)
      .unwrap()
      .with_attr("link", "aa")
      .with_attr("authorship", 3);
    assert!(!left.attr_eq(&right));
    right.unset_attr("authorship");
    assert!(left.attr_eq(&right));
    right.set_attr("link", "ac");
    assert!(!left.attr_eq(&right));
  }

  #[test]
  fn unset_attributes_read_as_absent() {
    let p = PositionRange::new(1, 3).unwrap();
    assert_eq!(p.attr("authorship"), None);
  }

  #[test]
  fn with_bounds_carries_attributes_verbatim() {
    let p = PositionRange::new(1, 3)
      .unwrap()
      .with_attr("authorship", "a")
      .with_attr("link", 34);
    let dup = p.with_bounds(4, 6).unwrap();
    assert_eq!(dup.attr("authorship"), p.attr("authorship"));
    assert_eq!(dup.attr("link"), p.attr("link"));
    assert_eq!(dup.begin(), 4);
    assert_eq!(dup.end(), 6);
    assert!(p.with_bounds(6, 4).is_err());
  }

  #[test]
  fn overlap_is_half_open() {
    let p = |b, e| PositionRange::new(b, e).unwrap();
    assert!(p(1, 5).overlaps(&p(4, 8)));
    assert!(p(4, 8).overlaps(&p(1, 5)));
    assert!(p(1, 8).overlaps(&p(2, 5)));
    // Touching at an endpoint is not overlap.
    assert!(!p(1, 4).overlaps(&p(4, 8)));
    assert!(!p(5, 5).overlaps(&p(5, 8)));
  }

  #[test]
  fn subtract_keeps_the_surviving_side() {
    let p = |b, e| PositionRange::new(b, e).unwrap();
    // No overlap: unchanged.
    assert_eq!(p(1, 4).subtract(&p(6, 9)), Some(p(1, 4)));
    // Full cover: nothing remains.
    assert_eq!(p(2, 7).subtract(&p(1, 8)), None);
    assert_eq!(p(2, 7).subtract(&p(2, 7)), None);
    // One-sided overlap.
    assert_eq!(p(1, 6).subtract(&p(4, 9)), Some(p(1, 4)));
    assert_eq!(p(4, 9).subtract(&p(1, 6)), Some(p(6, 9)));
    // Strictly inside: the left fragment survives.
    assert_eq!(p(1, 8).subtract(&p(2, 5)), Some(p(1, 2)));
  }

  #[test]
  fn subtract_fragments_carry_attributes() {
    let p = PositionRange::new(1, 6).unwrap().with_attr("link", "a");
    let cut = PositionRange::new(4, 9).unwrap();
    let rest = p.subtract(&cut).unwrap();
    assert_eq!(rest, PositionRange::new(1, 4).unwrap());
    assert_eq!(rest.attr("link"), Some(&AttrValue::Str("a".to_string())));
  }

  #[test]
  fn round_trip_over_valid_bounds() {
    let cases = [(0, 0), (0, 1), (1, 4), (0, MAXIMUM_SIZE), (2147483647, MAXIMUM_SIZE)];
    for &(begin, end) in &cases {
      let range = PositionRange::new(begin, end).unwrap();
      let reparsed = range.to_string().parse::<PositionRange>().unwrap();
      assert_eq!(range, reparsed);
    }
  }
}
