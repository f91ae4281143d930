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

//! Range and list specific operations, as traits.
//!
//! These traits name the seams of the algebra so that generic code can put
//! bounds on them without committing to a concrete type. The inherent
//! methods on [`PositionRange`](crate::range::PositionRange) and
//! [`PositionRangeList`](crate::range_list::PositionRangeList) do the work;
//! the implementations here delegate.

use num_integer::Integer;
use num_traits::Unsigned;

use crate::range::{PositionRange, MAXIMUM_SIZE};
use crate::range_list::PositionRangeList;

/// The number of positions a value covers.
pub trait Measure {
  type Length: Unsigned + Integer + Clone;

  fn measure(&self) -> Self::Length;
}

/// Whether two spans intersect as half-open ranges.
pub trait Overlap<RHS = Self> {
  fn overlap(&self, rhs: &RHS) -> bool;
}

/// Whether two values carry the same attributes.
pub trait AttributeEq<RHS = Self> {
  fn attribute_eq(&self, rhs: &RHS) -> bool;
}

pub trait Intersection<RHS = Self> {
  type Output;

  fn intersection(&self, rhs: &RHS) -> Self::Output;
}

pub trait Difference<RHS = Self> {
  type Output;

  fn difference(&self, rhs: &RHS) -> Self::Output;
}

pub trait Complement {
  type Output;

  fn complement(&self) -> Self::Output;
}

impl Measure for PositionRange {
  type Length = u64;

  fn measure(&self) -> u64 {
    self.size()
  }
}

impl Measure for PositionRangeList {
  type Length = u64;

  fn measure(&self) -> u64 {
    self.range_size()
  }
}

impl Overlap for PositionRange {
  fn overlap(&self, rhs: &PositionRange) -> bool {
    self.overlaps(rhs)
  }
}

impl AttributeEq for PositionRange {
  fn attribute_eq(&self, rhs: &PositionRange) -> bool {
    self.attr_eq(rhs)
  }
}

impl Intersection for PositionRangeList {
  type Output = PositionRangeList;

  fn intersection(&self, rhs: &PositionRangeList) -> PositionRangeList {
    self.intersect(rhs)
  }
}

/// Attribute-sensitive subtraction; see
/// [`subtract`](PositionRangeList::subtract).
impl Difference for PositionRangeList {
  type Output = PositionRangeList;

  fn difference(&self, rhs: &PositionRangeList) -> PositionRangeList {
    self.subtract(rhs, false)
  }
}

/// The complement within `[0, MAXIMUM_SIZE)`.
impl Complement for PositionRangeList {
  type Output = PositionRangeList;

  fn complement(&self) -> PositionRangeList {
    self
      .invert(MAXIMUM_SIZE)
      .expect("list members are bounded by MAXIMUM_SIZE")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn list(s: &str) -> PositionRangeList {
    s.parse().unwrap()
  }

  // The part of `a` not covered by `b`, through trait bounds only.
  fn residue<A>(a: &A, b: &A) -> A
  where
    A: Difference<Output = A> + Intersection<Output = A>,
  {
    a.difference(&a.intersection(b))
  }

  #[test]
  fn measure_is_the_covered_size() {
    assert_eq!(list("2,5:5,9").measure(), 7);
    assert_eq!("2,5".parse::<PositionRange>().unwrap().measure(), 3);
  }

  #[test]
  fn trait_operations_delegate() {
    let a = list("1,6:8,18");
    let b = list("3,12");
    assert_eq!(a.intersection(&b), list("3,6:8,12"));
    assert_eq!(a.difference(&b), list("1,3:12,18"));
    assert_eq!(
      a.complement().intersection(&list("0,20")),
      list("0,1:6,8:18,20")
    );
  }

  #[test]
  fn overlap_and_attribute_eq_delegate() {
    let left = "1,5".parse::<PositionRange>().unwrap();
    let right = "4,8".parse::<PositionRange>().unwrap();
    assert!(left.overlap(&right));
    assert!(left.attribute_eq(&right));
    assert!(!left.attribute_eq(&right.clone().with_attr("link", "a")));
  }

  #[test]
  fn generic_code_can_bound_on_the_traits() {
    let a = list("0,10");
    let b = list("4,6");
    assert_eq!(residue(&a, &b), list("0,4:6,10"));
  }
}
