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

//! This library models attributed half-open ranges of positions within a
//! shared coordinate space, conceptually character offsets into a piece of
//! text, and provides a closed algebra of set, geometric and structural
//! operations over collections of such ranges. It is used to track
//! overlapping, attributed annotation layers over text and to translate
//! coordinates between a full text and a view assembled from selected,
//! possibly reordered snippets of it.
//!
//! # Examples
//!
//! ```rust
//! use position_range::PositionRangeList;
//!
//! let list: PositionRangeList = "1,5:7,11".parse().unwrap();
//! let cut: PositionRangeList = "3,9".parse().unwrap();
//! let rest = list.subtract(&cut, true);
//! assert_eq!(rest.to_string(), "1,3:9,11");
//! ```
//!
//! For more examples see the [range module](range/index.html) and the
//! [range_list module](range_list/index.html).
//!
//! # References
//! * [Boost Interval Container Library](http://www.boost.org/doc/libs/1_57_0/libs/icl/doc/html/index.html)
//!

pub mod attributes;
pub mod error;
pub mod ops;
pub mod range;
pub mod range_list;
mod serialization;

pub use crate::attributes::{AttrValue, Attributes};
pub use crate::error::{ParseError, RangeError};
pub use crate::range::{Position, PositionRange, MAXIMUM_SIZE};
pub use crate::range_list::PositionRangeList;
