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

//! Open-ended attribute sets attached to ranges.
//!
//! An attribute is a named value carried by a range, for instance which
//! contributor wrote a span or what a span links to. Names are free-form:
//! any name may be attached without prior declaration, and reading an unset
//! name yields `None` rather than an error. Each range owns its own map;
//! there is no global registry of known names.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
  Str(String),
  Int(i64),
  Bool(bool),
}

impl fmt::Display for AttrValue {
  fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
    match self {
      AttrValue::Str(value) => write!(formatter, "{}", value),
      AttrValue::Int(value) => write!(formatter, "{}", value),
      AttrValue::Bool(value) => write!(formatter, "{}", value),
    }
  }
}

impl From<&str> for AttrValue {
  fn from(value: &str) -> AttrValue {
    AttrValue::Str(value.to_string())
  }
}

impl From<String> for AttrValue {
  fn from(value: String) -> AttrValue {
    AttrValue::Str(value)
  }
}

impl From<i64> for AttrValue {
  fn from(value: i64) -> AttrValue {
    AttrValue::Int(value)
  }
}

impl From<i32> for AttrValue {
  fn from(value: i32) -> AttrValue {
    AttrValue::Int(value as i64)
  }
}

impl From<bool> for AttrValue {
  fn from(value: bool) -> AttrValue {
    AttrValue::Bool(value)
  }
}

/// A mapping from attribute name to value.
///
/// Two attribute sets are equal iff every name present on either side has
/// the same value on both. Absence counts as a value, so a name set on one
/// side and unset on the other makes the sets unequal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attributes {
  entries: BTreeMap<String, AttrValue>,
}

impl Attributes {
  pub fn new() -> Attributes {
    Attributes {
      entries: BTreeMap::new(),
    }
  }

  /// Builder form of [`set`](Attributes::set).
  pub fn with<N, V>(mut self, name: N, value: V) -> Attributes
  where
    N: Into<String>,
    V: Into<AttrValue>,
  {
    self.set(name, value);
    self
  }

  pub fn set<N, V>(&mut self, name: N, value: V)
  where
    N: Into<String>,
    V: Into<AttrValue>,
  {
    self.entries.insert(name.into(), value.into());
  }

  /// Removes an attribute, returning its previous value if it was set.
  pub fn unset(&mut self, name: &str) -> Option<AttrValue> {
    self.entries.remove(name)
  }

  /// Reads an attribute. Unset names are absent, never an error.
  pub fn get(&self, name: &str) -> Option<&AttrValue> {
    self.entries.get(name)
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn iter(&self) -> btree_map::Iter<String, AttrValue> {
    self.entries.iter()
  }
}
