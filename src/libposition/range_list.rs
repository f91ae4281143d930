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

//! Ordered lists of position ranges and their algebra.
//!
//! A [`PositionRangeList`] keeps an ordered sequence of
//! [`PositionRange`](crate::range::PositionRange)s. Duplicates with identical
//! bounds but different attributes are permitted and meaningful: they
//! represent independent annotation layers over the same span. No standing
//! invariant forces disjointness; operations such as
//! [`merge_adjacents`](PositionRangeList::merge_adjacents) and
//! [`line_up_overlaps`](PositionRangeList::line_up_overlaps) establish
//! disjointness-up-to-attributes as a postcondition.
//!
//! Every realigning operation exists in two forms: a pure form on `&self`
//! returning a new list, and an `*_in_place` form on `&mut self`. The pure
//! forms operate on a private copy, so no partial mutation is observable
//! when a fallible operation fails. Operations that produce a new coordinate
//! space or a derived artifact ([`stack_adjacent`](PositionRangeList::stack_adjacent),
//! [`cluster_overlaps`](PositionRangeList::cluster_overlaps),
//! [`apply_to_string`](PositionRangeList::apply_to_string), the view
//! translations) are pure only.

use std::fmt;
use std::iter::FromIterator;
use std::mem;
use std::ops::Deref;
use std::slice;
use std::str::FromStr;
use std::vec;

use log::{debug, trace};

use crate::attributes::Attributes;
use crate::error::{ParseError, RangeError};
use crate::range::{Position, PositionRange, MAXIMUM_SIZE};

/// An ordered collection of position ranges.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PositionRangeList {
  pub(crate) ranges: Vec<PositionRange>,
}

impl PositionRangeList {
  pub fn new() -> PositionRangeList {
    PositionRangeList { ranges: vec![] }
  }

  pub fn from_ranges(ranges: Vec<PositionRange>) -> PositionRangeList {
    PositionRangeList { ranges }
  }

  /// A list covering the given text from start to end, counted in
  /// characters. Empty text yields an empty list.
  ///
  /// The text must be shorter than [`MAXIMUM_SIZE`] characters.
  pub fn around(text: &str) -> PositionRangeList {
    let len = text.chars().count();
    if len == 0 {
      return PositionRangeList::new();
    }
    let whole = PositionRange::new(0, len as Position)
      .expect("text length exceeds the maximum range size");
    PositionRangeList {
      ranges: vec![whole],
    }
  }

  /// Parses a `:`-joined list of ranges, attaching the given attributes to
  /// every parsed member. The empty string denotes an empty list.
  pub fn from_str_with(
    s: &str,
    attributes: Attributes,
  ) -> Result<PositionRangeList, ParseError> {
    if s.is_empty() {
      return Ok(PositionRangeList::new());
    }
    let mut ranges = Vec::new();
    for piece in s.split(':') {
      let range =
        PositionRange::from_str_with(piece, attributes.clone()).map_err(|err| match err {
          ParseError::Range(err) => ParseError::Range(err),
          _ => ParseError::InvalidList(s.to_string()),
        })?;
      ranges.push(range);
    }
    Ok(PositionRangeList { ranges })
  }

  pub fn push(&mut self, range: PositionRange) {
    self.ranges.push(range);
  }

  /// Sorts the members in place by `(begin, end)`, keeping the relative
  /// order of positionally equal members.
  pub fn sort(&mut self) {
    self.ranges.sort();
  }

  /// The combined size of all members.
  pub fn range_size(&self) -> u64 {
    self.ranges.iter().map(|r| r.size()).sum()
  }

  /// True if no member refers to a position at or beyond `size`.
  pub fn below(&self, size: Position) -> bool {
    let size = size.min(MAXIMUM_SIZE);
    let cover = PositionRangeList {
      ranges: vec![PositionRange::bare(0, size)],
    };
    self.within(&cover)
  }

  /// True if all members fall within the spans of `other`, attributes
  /// ignored: subtracting `other` leaves nothing.
  pub fn within(&self, other: &PositionRangeList) -> bool {
    self.subtract(other, true).ranges.is_empty()
  }

  /// The index of the first member positionally equal to `target`. In
  /// attribute-sensitive mode the member must be attribute-equal as well.
  pub fn index_of(&self, target: &PositionRange, attribute_sensitive: bool) -> Option<usize> {
    self
      .ranges
      .iter()
      .position(|r| r == target && (!attribute_sensitive || r.attr_eq(target)))
  }

  /// Set-theoretic subtraction, per attribute group.
  ///
  /// Every member overlapping a member of `other` that it is
  /// attribute-equal to (or any overlapping member, if
  /// `ignore_attributes`) is trimmed to the surviving side, split in two,
  /// or removed when fully covered. Members overlapping only
  /// attribute-different subtrahends are left untouched.
  ///
  /// ```rust
  /// use position_range::PositionRangeList;
  ///
  /// let list: PositionRangeList = "1,6:7,9:10,12".parse().unwrap();
  /// let cut: PositionRangeList = "4,7:8,10".parse().unwrap();
  /// assert_eq!(list.subtract(&cut, true).to_string(), "1,4:7,8:10,12");
  /// ```
  pub fn subtract(&self, other: &PositionRangeList, ignore_attributes: bool) -> PositionRangeList {
    let mut result = self.clone();
    result.subtract_in_place(other, ignore_attributes);
    result
  }

  /// In-place form of [`subtract`](PositionRangeList::subtract).
  ///
  /// The members are processed over a sorted working copy, but surviving
  /// fragments are written back in the original member order.
  pub fn subtract_in_place(&mut self, other: &PositionRangeList, ignore_attributes: bool) {
    if self.ranges.is_empty() || other.ranges.is_empty() {
      return;
    }
    // Coalescing the subtrahend first keeps the overlap scan linear: its
    // members are distinct and ascending afterwards. Empty members subtract
    // nothing and are dropped so they cannot split a member in two.
    let subtrahend = other.merge_adjacents(false).without_empty_ranges();
    let mut work: Vec<(usize, PositionRange)> = mem::take(&mut self.ranges)
      .into_iter()
      .enumerate()
      .collect();
    work.sort_by(|left, right| left.1.cmp(&right.1));
    let mut start = 0;
    for sub in subtrahend.ranges.iter() {
      let mut p = start;
      while p < work.len() && work[p].1.end() <= sub.begin() {
        p += 1;
      }
      if p == work.len() {
        break;
      }
      start = p;
      while p < work.len() {
        // Earlier trims can leave the tail locally unordered, so every
        // remaining member is checked for overlap rather than stopping at
        // the first miss.
        if !work[p].1.overlaps(sub) {
          p += 1;
          continue;
        }
        if !(ignore_attributes || work[p].1.attr_eq(sub)) {
          p += 1;
          continue;
        }
        let (slot, examined) = work[p].clone();
        let mut kept = 0;
        if examined.begin() < sub.begin() {
          // Overlap at the end of the examined range.
          work[p] = (slot, examined.respan(examined.begin(), sub.begin()));
          kept = 1;
        }
        if examined.end() > sub.end() {
          // Overlap at the beginning.
          let right = (slot, examined.respan(sub.end(), examined.end()));
          if kept == 1 {
            work.insert(p + 1, right);
          } else {
            work[p] = right;
          }
          kept += 1;
        }
        if kept == 0 {
          // Total overlap.
          work.remove(p);
        } else {
          p += kept;
        }
      }
    }
    work.sort_by_key(|&(slot, _)| slot);
    self.ranges = work.into_iter().map(|(_, range)| range).collect();
  }

  /// Removes a single range, attribute-sensitively.
  pub fn delete(&self, range: &PositionRange) -> PositionRangeList {
    let mut result = self.clone();
    result.delete_in_place(range);
    result
  }

  /// In-place form of [`delete`](PositionRangeList::delete).
  pub fn delete_in_place(&mut self, range: &PositionRange) {
    let single = PositionRangeList {
      ranges: vec![range.clone()],
    };
    self.subtract_in_place(&single, false);
  }

  /// Set-theoretic intersection: all members and parts of members falling
  /// outside the spans of `other` are removed. Intersection always ignores
  /// attributes; surviving fragments keep their own.
  ///
  /// ```rust
  /// use position_range::PositionRangeList;
  ///
  /// let list: PositionRangeList = "1,6:8,18".parse().unwrap();
  /// let window: PositionRangeList = "3,12".parse().unwrap();
  /// assert_eq!(list.intersect(&window).to_string(), "3,6:8,12");
  /// ```
  pub fn intersect(&self, other: &PositionRangeList) -> PositionRangeList {
    let mut result = self.clone();
    result.intersect_in_place(other);
    result
  }

  /// In-place form of [`intersect`](PositionRangeList::intersect).
  pub fn intersect_in_place(&mut self, other: &PositionRangeList) {
    let complement = other
      .invert(MAXIMUM_SIZE)
      .expect("list members are bounded by MAXIMUM_SIZE");
    self.subtract_in_place(&complement, true);
  }

  /// The complement within `[0, max_size)`.
  ///
  /// All covered positions become excluded and all excluded positions
  /// become covered. The produced gap ranges carry no attributes, since
  /// attribution is meaningless for a complement. Fails with [`RangeError`]
  /// if any member ends beyond `max_size`.
  ///
  /// ```rust
  /// use position_range::PositionRangeList;
  ///
  /// let list: PositionRangeList = "5,15".parse().unwrap();
  /// let inverted = list.invert(position_range::MAXIMUM_SIZE).unwrap();
  /// assert_eq!(inverted.to_string(), "0,5:15,2147483648");
  /// ```
  pub fn invert(&self, max_size: Position) -> Result<PositionRangeList, RangeError> {
    for range in self.ranges.iter() {
      if range.end() > max_size {
        return Err(RangeError {
          from: range.begin() as i64,
          to: range.end() as i64,
        });
      }
    }
    let mut spans: Vec<(Position, Position)> = self
      .ranges
      .iter()
      .filter(|r| r.size() > 0)
      .map(|r| (r.begin(), r.end()))
      .collect();
    spans.sort();
    let mut gaps = Vec::new();
    let mut cursor: Position = 0;
    for (begin, end) in spans {
      if begin > cursor {
        gaps.push(PositionRange::bare(cursor, begin));
      }
      cursor = cursor.max(end);
    }
    if cursor < max_size {
      gaps.push(PositionRange::bare(cursor, max_size));
    }
    Ok(PositionRangeList { ranges: gaps })
  }

  /// In-place form of [`invert`](PositionRangeList::invert). The receiver
  /// is untouched when the operation fails.
  pub fn invert_in_place(&mut self, max_size: Position) -> Result<(), RangeError> {
    *self = self.invert(max_size)?;
    Ok(())
  }

  /// Coalesces adjacent members: wherever a member's `end` equals the next
  /// member's `begin` and the two are attribute-equal (or unconditionally,
  /// if `ignore_attributes`), the pair becomes one wider range. Sorts
  /// first.
  ///
  /// ```rust
  /// use position_range::PositionRangeList;
  ///
  /// let list: PositionRangeList = "2,4:6,10:10,13".parse().unwrap();
  /// assert_eq!(list.merge_adjacents(false).to_string(), "2,4:6,13");
  /// ```
  pub fn merge_adjacents(&self, ignore_attributes: bool) -> PositionRangeList {
    let mut result = self.clone();
    result.merge_adjacents_in_place(ignore_attributes);
    result
  }

  /// In-place form of [`merge_adjacents`](PositionRangeList::merge_adjacents).
  pub fn merge_adjacents_in_place(&mut self, ignore_attributes: bool) {
    self.ranges.sort();
    let drained = mem::take(&mut self.ranges);
    let mut merged: Vec<PositionRange> = Vec::with_capacity(drained.len());
    for range in drained {
      let coalesce = merged
        .last()
        .map_or(false, |last| {
          last.end() == range.begin() && (ignore_attributes || last.attr_eq(&range))
        });
      if coalesce {
        if let Some(last) = merged.last_mut() {
          let widened = last.respan(last.begin(), range.end());
          *last = widened;
        }
      } else {
        merged.push(range);
      }
    }
    self.ranges = merged;
  }

  /// Decomposes overlapping, differently-attributed members into maximal
  /// common sub-spans.
  ///
  /// Afterwards every member either equals or is disjoint from every other
  /// member (up to endpoints), and every original attribution is preserved
  /// on the sub-spans that carried it. Multiple members may refer to the
  /// same span, but then with identical bounds.
  pub fn line_up_overlaps(&self) -> PositionRangeList {
    let mut result = self.clone();
    result.line_up_overlaps_in_place();
    result
  }

  /// In-place form of [`line_up_overlaps`](PositionRangeList::line_up_overlaps).
  ///
  /// Runs a fixed-point loop: after any split the list is re-sorted and the
  /// scan restarts from the beginning, since a split can create a new
  /// misaligned pair earlier in the list.
  pub fn line_up_overlaps_in_place(&mut self) {
    self.merge_adjacents_in_place(false);
    let mut splits = 0usize;
    loop {
      self.ranges.sort();
      let mut split = false;
      for i in 0..self.ranges.len().saturating_sub(1) {
        let earlier = self.ranges[i].clone();
        let later = self.ranges[i + 1].clone();
        if earlier.end() <= later.begin() {
          continue;
        }
        if earlier.begin() != later.begin() {
          // The begins are not lined up yet: split the earlier member at
          // the later one's begin.
          self.ranges[i] = earlier.respan(earlier.begin(), later.begin());
          self
            .ranges
            .insert(i + 1, earlier.respan(later.begin(), earlier.end()));
        } else if earlier.end() != later.end() {
          // Equal begins; the sort makes the later member the longer one,
          // so split it at the earlier one's end.
          self.ranges[i + 1] = later.respan(later.begin(), earlier.end());
          self
            .ranges
            .insert(i + 2, later.respan(earlier.end(), later.end()));
        } else {
          continue;
        }
        splits += 1;
        split = true;
        break;
      }
      if !split {
        break;
      }
    }
    trace!(
      "lined up overlaps into {} ranges after {} splits",
      self.ranges.len(),
      splits
    );
  }

  /// Translates every member along the coordinate axis. Fails with
  /// [`RangeError`] if any member would leave `[0, MAXIMUM_SIZE]`; the
  /// receiver of the in-place form is untouched in that case.
  pub fn translate(&self, delta: i64) -> Result<PositionRangeList, RangeError> {
    for range in self.ranges.iter() {
      let begin = range.begin() as i64 + delta;
      let end = range.end() as i64 + delta;
      if begin < 0 || end > MAXIMUM_SIZE as i64 {
        return Err(RangeError {
          from: begin,
          to: end,
        });
      }
    }
    Ok(PositionRangeList {
      ranges: self.ranges.iter().map(|r| r.shifted(delta)).collect(),
    })
  }

  /// In-place form of [`translate`](PositionRangeList::translate).
  pub fn translate_in_place(&mut self, delta: i64) -> Result<(), RangeError> {
    *self = self.translate(delta)?;
    Ok(())
  }

  /// Splits members of this list wherever a chunk boundary of `other`
  /// falls strictly inside them, walking both lists by cumulative size.
  ///
  /// Afterwards the two lists (of equal total size) can be walked
  /// position-for-position with matching cut points.
  pub fn align_chunks(&self, other: &PositionRangeList) -> PositionRangeList {
    let mut cuts: Vec<u64> = Vec::with_capacity(other.ranges.len());
    let mut acc = 0u64;
    for chunk in other.ranges.iter() {
      acc += chunk.size();
      cuts.push(acc);
    }
    let mut aligned = Vec::with_capacity(self.ranges.len());
    let mut offset = 0u64;
    let mut next_cut = 0;
    for range in self.ranges.iter() {
      let end_offset = offset + range.size();
      let mut current = range.clone();
      let mut current_offset = offset;
      while next_cut < cuts.len() && cuts[next_cut] <= current_offset {
        next_cut += 1;
      }
      while next_cut < cuts.len() && cuts[next_cut] < end_offset {
        let cut = cuts[next_cut];
        let split_at = (current.begin() as u64 + (cut - current_offset)) as Position;
        aligned.push(current.respan(current.begin(), split_at));
        current = current.respan(split_at, current.end());
        current_offset = cut;
        next_cut += 1;
      }
      aligned.push(current);
      offset = end_offset;
    }
    PositionRangeList { ranges: aligned }
  }

  /// In-place form of [`align_chunks`](PositionRangeList::align_chunks).
  pub fn align_chunks_in_place(&mut self, other: &PositionRangeList) {
    *self = self.align_chunks(other);
  }

  /// Splices `to_insert` into this list at the offsets named by
  /// `at_ranges`, counted in cumulative member size from the beginning and
  /// interluded with `to_skip`.
  ///
  /// `to_insert` and `at_ranges` must cover the same total size; they are
  /// chunk-aligned against each other first, so the k-th aligned insert
  /// chunk lands at the k-th aligned target chunk. A member straddling a
  /// named offset is split there. Chunks named by `to_skip` advance the
  /// cursor without insertion.
  ///
  /// ```rust
  /// use position_range::PositionRangeList;
  ///
  /// let list: PositionRangeList = "39,49:16,21".parse().unwrap();
  /// let spliced = list.insert_at_ranges(
  ///   &"100,103:6,8".parse().unwrap(),
  ///   &"10,13:19,21".parse().unwrap(),
  ///   &"13,19".parse().unwrap(),
  /// ).unwrap();
  /// assert_eq!(spliced, "39,49:100,103:6,8:16,21".parse().unwrap());
  /// ```
  pub fn insert_at_ranges(
    &self,
    to_insert: &PositionRangeList,
    at_ranges: &PositionRangeList,
    to_skip: &PositionRangeList,
  ) -> Result<PositionRangeList, ParseError> {
    let mut result = self.clone();
    result.insert_at_ranges_in_place(to_insert, at_ranges, to_skip)?;
    Ok(result)
  }

  /// In-place form of [`insert_at_ranges`](PositionRangeList::insert_at_ranges).
  /// The receiver is untouched when the sizes mismatch.
  pub fn insert_at_ranges_in_place(
    &mut self,
    to_insert: &PositionRangeList,
    at_ranges: &PositionRangeList,
    to_skip: &PositionRangeList,
  ) -> Result<(), ParseError> {
    if to_insert.range_size() != at_ranges.range_size() {
      return Err(ParseError::SizeMismatch {
        left: to_insert.range_size(),
        right: at_ranges.range_size(),
      });
    }
    // Empty chunks insert nothing and would break the pairwise chunk
    // correspondence, so they are dropped up front.
    let to_insert = to_insert.without_empty_ranges();
    let at_ranges = at_ranges.without_empty_ranges();
    let inserts = to_insert.align_chunks(&at_ranges);
    let targets = at_ranges.align_chunks(&to_insert);
    debug_assert_eq!(inserts.ranges.len(), targets.ranges.len());
    debug!(
      "splicing {} aligned chunks at {} offsets, skipping {}",
      inserts.ranges.len(),
      targets.ranges.len(),
      to_skip.ranges.len()
    );
    let mut actions: Vec<(PositionRange, Option<usize>)> = targets
      .ranges
      .iter()
      .cloned()
      .enumerate()
      .map(|(k, range)| (range, Some(k)))
      .chain(to_skip.ranges.iter().cloned().map(|range| (range, None)))
      .collect();
    actions.sort_by(|left, right| left.0.cmp(&right.0));

    let mut position = 0u64;
    let mut member = 0usize;
    for (action, insert_chunk) in actions {
      while position < action.begin() as u64 && member < self.ranges.len() {
        position += self.ranges[member].size();
        member += 1;
      }
      if position > action.begin() as u64 {
        // The offset falls inside the member consumed last: cut it there.
        let straddling = self.ranges[member - 1].clone();
        let overshoot = position - action.begin() as u64;
        let cut = (straddling.end() as u64 - overshoot) as Position;
        self.ranges[member - 1] = straddling.respan(straddling.begin(), cut);
        self
          .ranges
          .insert(member, straddling.respan(cut, straddling.end()));
        position = action.begin() as u64;
      }
      if let Some(k) = insert_chunk {
        self.ranges.insert(member, inserts.ranges[k].clone());
        member += 1;
      }
      position += action.size();
    }
    Ok(())
  }

  /// Repacks the members contiguously from position zero, preserving each
  /// member's size and relative order and inserting `spacing` empty
  /// positions between consecutive outputs. Original positions and
  /// attributes are discarded; only the sizes survive.
  ///
  /// ```rust
  /// use position_range::PositionRangeList;
  ///
  /// let list: PositionRangeList = "50,53:10,30".parse().unwrap();
  /// assert_eq!(list.stack_adjacent(0).unwrap().to_string(), "0,3:3,23");
  /// assert_eq!(list.stack_adjacent(1).unwrap().to_string(), "0,3:4,24");
  /// ```
  pub fn stack_adjacent(&self, spacing: Position) -> Result<PositionRangeList, RangeError> {
    let mut stacked = Vec::with_capacity(self.ranges.len());
    let mut cursor = 0u64;
    for range in self.ranges.iter() {
      let end = cursor + range.size();
      if end > MAXIMUM_SIZE as u64 {
        return Err(RangeError {
          from: cursor as i64,
          to: end as i64,
        });
      }
      stacked.push(PositionRange::bare(cursor as Position, end as Position));
      cursor = end + spacing as u64;
    }
    Ok(PositionRangeList { ranges: stacked })
  }

  /// Lines up overlaps, then partitions the result into maximal runs of
  /// members sharing identical bounds. Each run, and each singleton,
  /// becomes its own list, in order.
  pub fn cluster_overlaps(&self) -> Vec<PositionRangeList> {
    if self.ranges.is_empty() {
      return vec![];
    }
    let lined_up = self.line_up_overlaps();
    let mut clusters: Vec<PositionRangeList> = Vec::new();
    for range in lined_up {
      let same_span = clusters.last().map_or(false, |cluster| cluster[0] == range);
      if same_span {
        if let Some(cluster) = clusters.last_mut() {
          cluster.push(range);
        }
      } else {
        clusters.push(PositionRangeList {
          ranges: vec![range],
        });
      }
    }
    clusters
  }

  /// Extracts the substring designated by each member, in list order,
  /// joined by `separator`. Positions are counted in characters. Fails if
  /// any member ends past the end of the text.
  ///
  /// ```rust
  /// use position_range::PositionRangeList;
  ///
  /// let list: PositionRangeList = "4,6:8,9:0,2".parse().unwrap();
  /// assert_eq!(list.apply_to_string("123456789", "").unwrap(), "56912");
  /// ```
  pub fn apply_to_string(&self, text: &str, separator: &str) -> Result<String, ParseError> {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len() as u64;
    for range in self.ranges.iter() {
      if range.end() as u64 > len {
        return Err(ParseError::PastEndOfText {
          end: range.end() as u64,
          len,
        });
      }
    }
    let pieces: Vec<String> = self
      .ranges
      .iter()
      .map(|r| chars[r.begin() as usize..r.end() as usize].iter().collect())
      .collect();
    Ok(pieces.join(separator))
  }

  /// Translates this list into the view coordinate space described by
  /// `view`.
  ///
  /// `view` names a sequence of snippets of the absolute space, laid out
  /// contiguously in view coordinates in the order given. Each member is
  /// intersected against every snippet in turn and the overlapping portion
  /// is shifted into place; fragments recombined across a snippet boundary
  /// are coalesced at the end.
  pub fn translate_to_view(&self, view: &PositionRangeList) -> PositionRangeList {
    let mut relative = PositionRangeList::new();
    let mut view_position = 0u64;
    for snippet in view.ranges.iter() {
      let window = PositionRangeList {
        ranges: vec![snippet.clone()],
      };
      let overlapping = self.intersect(&window);
      let vector = view_position as i64 - snippet.begin() as i64;
      relative
        .ranges
        .extend(overlapping.ranges.iter().map(|r| r.shifted(vector)));
      view_position += snippet.size();
    }
    relative.merge_adjacents_in_place(false);
    relative
  }

  /// Translates this list of view-coordinate ranges back into absolute
  /// space. Mirror of [`translate_to_view`](PositionRangeList::translate_to_view).
  ///
  /// The view's snippets must fit within `[0, MAXIMUM_SIZE)` in view
  /// coordinates as well.
  pub fn translate_from_view(&self, view: &PositionRangeList) -> PositionRangeList {
    let mut absolute = PositionRangeList::new();
    let mut view_position = 0u64;
    for snippet in view.ranges.iter() {
      let window = PositionRangeList {
        ranges: vec![PositionRange::bare(
          view_position as Position,
          (view_position + snippet.size()) as Position,
        )],
      };
      let overlapping = self.intersect(&window);
      let vector = snippet.begin() as i64 - view_position as i64;
      absolute
        .ranges
        .extend(overlapping.ranges.iter().map(|r| r.shifted(vector)));
      view_position += snippet.size();
    }
    absolute.merge_adjacents_in_place(false);
    absolute
  }

  fn without_empty_ranges(&self) -> PositionRangeList {
    PositionRangeList {
      ranges: self
        .ranges
        .iter()
        .filter(|r| r.size() > 0)
        .cloned()
        .collect(),
    }
  }
}

impl fmt::Display for PositionRangeList {
  /// Sorts, then joins each member's string form with `:`.
  fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
    let mut sorted = self.ranges.clone();
    sorted.sort();
    let mut first = true;
    for range in sorted {
      if !first {
        write!(formatter, ":")?;
      }
      write!(formatter, "{}", range)?;
      first = false;
    }
    Ok(())
  }
}

impl FromStr for PositionRangeList {
  type Err = ParseError;

  fn from_str(s: &str) -> Result<PositionRangeList, ParseError> {
    PositionRangeList::from_str_with(s, Attributes::new())
  }
}

impl Deref for PositionRangeList {
  type Target = [PositionRange];

  fn deref(&self) -> &[PositionRange] {
    &self.ranges
  }
}

impl FromIterator<PositionRange> for PositionRangeList {
  fn from_iter<I>(iter: I) -> PositionRangeList
  where
    I: IntoIterator<Item = PositionRange>,
  {
    PositionRangeList {
      ranges: iter.into_iter().collect(),
    }
  }
}

impl Extend<PositionRange> for PositionRangeList {
  fn extend<I>(&mut self, iter: I)
  where
    I: IntoIterator<Item = PositionRange>,
  {
    self.ranges.extend(iter);
  }
}

impl IntoIterator for PositionRangeList {
  type Item = PositionRange;
  type IntoIter = vec::IntoIter<PositionRange>;

  fn into_iter(self) -> vec::IntoIter<PositionRange> {
    self.ranges.into_iter()
  }
}

impl<'a> IntoIterator for &'a PositionRangeList {
  type Item = &'a PositionRange;
  type IntoIter = slice::Iter<'a, PositionRange>;

  fn into_iter(self) -> slice::Iter<'a, PositionRange> {
    self.ranges.iter()
  }
}


#[cfg(test)]
mod proptests {
  use super::*;
  use proptest::prelude::*;

  const BOUND: Position = 10_000;

  fn arb_list() -> impl Strategy<Value = PositionRangeList> {
    proptest::collection::vec((0u32..BOUND, 1u32..60), 0..8).prop_map(|pairs| {
      pairs
        .into_iter()
        .map(|(begin, size)| PositionRange::new(begin, begin + size).unwrap())
        .collect()
    })
  }

  fn disjoint_list() -> impl Strategy<Value = PositionRangeList> {
    proptest::collection::vec((0u32..50, 1u32..50), 0..8).prop_map(|steps| {
      let mut ranges = Vec::new();
      let mut cursor = 0u32;
      for (gap, size) in steps {
        let begin = cursor + gap;
        let end = begin + size;
        ranges.push(PositionRange::new(begin, end).unwrap());
        cursor = end;
      }
      PositionRangeList::from_ranges(ranges)
    })
  }

  fn normalized(ranges: &PositionRangeList) -> PositionRangeList {
    ranges
      .invert(MAXIMUM_SIZE)
      .unwrap()
      .invert(MAXIMUM_SIZE)
      .unwrap()
  }

  proptest! {
    #[test]
    fn display_parse_round_trip(ranges in arb_list()) {
      let mut sorted = ranges.clone();
      sorted.sort();
      let reparsed: PositionRangeList = ranges.to_string().parse().unwrap();
      prop_assert_eq!(reparsed, sorted);
    }

    #[test]
    fn invert_is_an_involution_up_to_merging(ranges in disjoint_list()) {
      let twice = ranges.invert(BOUND).unwrap().invert(BOUND).unwrap();
      prop_assert_eq!(twice, ranges.merge_adjacents(true));
    }

    #[test]
    fn subtracting_a_list_from_itself_leaves_nothing(ranges in arb_list()) {
      prop_assert!(ranges.subtract(&ranges, false).is_empty());
    }

    #[test]
    fn intersection_covers_the_same_spans_both_ways(a in arb_list(), b in arb_list()) {
      prop_assert_eq!(
        normalized(&a.intersect(&b)),
        normalized(&b.intersect(&a))
      );
    }

    #[test]
    fn merge_adjacents_is_idempotent(ranges in arb_list()) {
      let once = ranges.merge_adjacents(false);
      prop_assert_eq!(once.merge_adjacents(false), once.clone());
      let once_blind = ranges.merge_adjacents(true);
      prop_assert_eq!(once_blind.merge_adjacents(true), once_blind.clone());
    }

    #[test]
    fn line_up_leaves_pairs_disjoint_or_identical(ranges in arb_list()) {
      let lined_up = ranges.line_up_overlaps();
      for (i, left) in lined_up.iter().enumerate() {
        for right in lined_up.iter().skip(i + 1) {
          prop_assert!(
            !left.overlaps(right)
              || (left.begin() == right.begin() && left.end() == right.end())
          );
        }
      }
      // Line-up reorganizes attribution but never the covered spans.
      prop_assert_eq!(normalized(&lined_up), normalized(&ranges));
    }
  }
}
