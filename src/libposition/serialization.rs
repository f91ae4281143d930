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

//! Serde support for ranges, lists and attribute sets.
//!
//! A range serializes as a three-field struct `{begin, end, attributes}`, a
//! list as a sequence of ranges, and an attribute set as a map. The bounds
//! are re-validated on deserialization, so a deserialized range upholds the
//! same invariants as a constructed one.

use std::convert::TryFrom;
use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, SerializeStruct, Serializer};

use crate::attributes::{AttrValue, Attributes};
use crate::range::PositionRange;
use crate::range_list::PositionRangeList;

impl Serialize for AttrValue {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    match self {
      AttrValue::Str(value) => serializer.serialize_str(value),
      AttrValue::Int(value) => serializer.serialize_i64(*value),
      AttrValue::Bool(value) => serializer.serialize_bool(*value),
    }
  }
}

struct AttrValueVisitor;

impl<'de> Visitor<'de> for AttrValueVisitor {
  type Value = AttrValue;

  fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
    formatter.write_str("a string, integer or boolean attribute value")
  }

  fn visit_str<E>(self, value: &str) -> Result<AttrValue, E>
  where
    E: de::Error,
  {
    Ok(AttrValue::Str(value.to_string()))
  }

  fn visit_string<E>(self, value: String) -> Result<AttrValue, E>
  where
    E: de::Error,
  {
    Ok(AttrValue::Str(value))
  }

  fn visit_i64<E>(self, value: i64) -> Result<AttrValue, E>
  where
    E: de::Error,
  {
    Ok(AttrValue::Int(value))
  }

  fn visit_u64<E>(self, value: u64) -> Result<AttrValue, E>
  where
    E: de::Error,
  {
    i64::try_from(value)
      .map(AttrValue::Int)
      .map_err(|_| E::custom(format!("attribute value {} does not fit in i64", value)))
  }

  fn visit_bool<E>(self, value: bool) -> Result<AttrValue, E>
  where
    E: de::Error,
  {
    Ok(AttrValue::Bool(value))
  }
}

impl<'de> Deserialize<'de> for AttrValue {
  fn deserialize<D>(deserializer: D) -> Result<AttrValue, D::Error>
  where
    D: Deserializer<'de>,
  {
    deserializer.deserialize_any(AttrValueVisitor)
  }
}

impl Serialize for Attributes {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    let mut map = serializer.serialize_map(Some(self.len()))?;
    for (name, value) in self.iter() {
      map.serialize_entry(name, value)?;
    }
    map.end()
  }
}

struct AttributesVisitor;

impl<'de> Visitor<'de> for AttributesVisitor {
  type Value = Attributes;

  fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
    formatter.write_str("a map of attribute names to values")
  }

  fn visit_map<A>(self, mut access: A) -> Result<Attributes, A::Error>
  where
    A: MapAccess<'de>,
  {
    let mut attributes = Attributes::new();
    while let Some((name, value)) = access.next_entry::<String, AttrValue>()? {
      attributes.set(name, value);
    }
    Ok(attributes)
  }
}

impl<'de> Deserialize<'de> for Attributes {
  fn deserialize<D>(deserializer: D) -> Result<Attributes, D::Error>
  where
    D: Deserializer<'de>,
  {
    deserializer.deserialize_map(AttributesVisitor)
  }
}

const RANGE_FIELDS: &[&str] = &["begin", "end", "attributes"];

impl Serialize for PositionRange {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    let mut state = serializer.serialize_struct("PositionRange", 3)?;
    state.serialize_field("begin", &self.begin())?;
    state.serialize_field("end", &self.end())?;
    state.serialize_field("attributes", self.attributes())?;
    state.end()
  }
}

enum RangeField {
  Begin,
  End,
  Attributes,
}

struct RangeFieldVisitor;

impl<'de> Visitor<'de> for RangeFieldVisitor {
  type Value = RangeField;

  fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
    formatter.write_str("`begin`, `end` or `attributes`")
  }

  fn visit_str<E>(self, value: &str) -> Result<RangeField, E>
  where
    E: de::Error,
  {
    match value {
      "begin" => Ok(RangeField::Begin),
      "end" => Ok(RangeField::End),
      "attributes" => Ok(RangeField::Attributes),
      _ => Err(de::Error::unknown_field(value, RANGE_FIELDS)),
    }
  }
}

impl<'de> Deserialize<'de> for RangeField {
  fn deserialize<D>(deserializer: D) -> Result<RangeField, D::Error>
  where
    D: Deserializer<'de>,
  {
    deserializer.deserialize_identifier(RangeFieldVisitor)
  }
}

struct PositionRangeVisitor;

impl<'de> Visitor<'de> for PositionRangeVisitor {
  type Value = PositionRange;

  fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
    formatter.write_str("a position range")
  }

  fn visit_seq<A>(self, mut seq: A) -> Result<PositionRange, A::Error>
  where
    A: SeqAccess<'de>,
  {
    let begin = seq
      .next_element()?
      .ok_or_else(|| de::Error::invalid_length(0, &self))?;
    let end = seq
      .next_element()?
      .ok_or_else(|| de::Error::invalid_length(1, &self))?;
    let attributes = seq.next_element()?.unwrap_or_default();
    PositionRange::with_attributes(begin, end, attributes).map_err(de::Error::custom)
  }

  fn visit_map<A>(self, mut map: A) -> Result<PositionRange, A::Error>
  where
    A: MapAccess<'de>,
  {
    let mut begin = None;
    let mut end = None;
    let mut attributes = None;
    while let Some(field) = map.next_key()? {
      match field {
        RangeField::Begin => {
          if begin.is_some() {
            return Err(de::Error::duplicate_field("begin"));
          }
          begin = Some(map.next_value()?);
        }
        RangeField::End => {
          if end.is_some() {
            return Err(de::Error::duplicate_field("end"));
          }
          end = Some(map.next_value()?);
        }
        RangeField::Attributes => {
          if attributes.is_some() {
            return Err(de::Error::duplicate_field("attributes"));
          }
          attributes = Some(map.next_value()?);
        }
      }
    }
    let begin = begin.ok_or_else(|| de::Error::missing_field("begin"))?;
    let end = end.ok_or_else(|| de::Error::missing_field("end"))?;
    let attributes = attributes.unwrap_or_default();
    PositionRange::with_attributes(begin, end, attributes).map_err(de::Error::custom)
  }
}

impl<'de> Deserialize<'de> for PositionRange {
  fn deserialize<D>(deserializer: D) -> Result<PositionRange, D::Error>
  where
    D: Deserializer<'de>,
  {
    deserializer.deserialize_struct("PositionRange", RANGE_FIELDS, PositionRangeVisitor)
  }
}

impl Serialize for PositionRangeList {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    let mut seq = serializer.serialize_seq(Some(self.len()))?;
    for range in self.iter() {
      seq.serialize_element(range)?;
    }
    seq.end()
  }
}

struct PositionRangeListVisitor;

impl<'de> Visitor<'de> for PositionRangeListVisitor {
  type Value = PositionRangeList;

  fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
    formatter.write_str("a sequence of position ranges")
  }

  fn visit_seq<A>(self, mut seq: A) -> Result<PositionRangeList, A::Error>
  where
    A: SeqAccess<'de>,
  {
    let mut ranges = Vec::new();
    while let Some(range) = seq.next_element()? {
      ranges.push(range);
    }
    Ok(PositionRangeList::from_ranges(ranges))
  }
}

impl<'de> Deserialize<'de> for PositionRangeList {
  fn deserialize<D>(deserializer: D) -> Result<PositionRangeList, D::Error>
  where
    D: Deserializer<'de>,
  {
    deserializer.deserialize_seq(PositionRangeListVisitor)
  }
}

#[cfg(test)]
mod tests {
  use serde_test::{assert_de_tokens, assert_de_tokens_error, assert_tokens, Token};

  use crate::attributes::{AttrValue, Attributes};
  use crate::range::PositionRange;
  use crate::range_list::PositionRangeList;

  #[test]
  fn range_round_trips_through_tokens() {
    let range = PositionRange::new(2, 8).unwrap().with_attr("link", "a");
    assert_tokens(
      &range,
      &[
        Token::Struct {
          name: "PositionRange",
          len: 3,
        },
        Token::Str("begin"),
        Token::U32(2),
        Token::Str("end"),
        Token::U32(8),
        Token::Str("attributes"),
        Token::Map { len: Some(1) },
        Token::Str("link"),
        Token::Str("a"),
        Token::MapEnd,
        Token::StructEnd,
      ],
    );
  }

  #[test]
  fn attribute_values_keep_their_kind() {
    let attrs = Attributes::new()
      .with("authorship", 1)
      .with("final", true)
      .with("link", "aa");
    assert_tokens(
      &attrs,
      &[
        Token::Map { len: Some(3) },
        Token::Str("authorship"),
        Token::I64(1),
        Token::Str("final"),
        Token::Bool(true),
        Token::Str("link"),
        Token::Str("aa"),
        Token::MapEnd,
      ],
    );
  }

  #[test]
  fn list_serializes_as_a_sequence() {
    let list: PositionRangeList = "1,3:4,6".parse().unwrap();
    assert_tokens(
      &list,
      &[
        Token::Seq { len: Some(2) },
        Token::Struct {
          name: "PositionRange",
          len: 3,
        },
        Token::Str("begin"),
        Token::U32(1),
        Token::Str("end"),
        Token::U32(3),
        Token::Str("attributes"),
        Token::Map { len: Some(0) },
        Token::MapEnd,
        Token::StructEnd,
        Token::Struct {
          name: "PositionRange",
          len: 3,
        },
        Token::Str("begin"),
        Token::U32(4),
        Token::Str("end"),
        Token::U32(6),
        Token::Str("attributes"),
        Token::Map { len: Some(0) },
        Token::MapEnd,
        Token::StructEnd,
        Token::SeqEnd,
      ],
    );
  }

  #[test]
  fn deserialized_attributes_survive() {
    let expected = PositionRange::new(2, 8).unwrap().with_attr("authorship", 1);
    // Positional equality would not notice a lost attribute, so check the
    // deserialized value by hand.
    assert_de_tokens(
      &expected,
      &[
        Token::Struct {
          name: "PositionRange",
          len: 3,
        },
        Token::Str("begin"),
        Token::U32(2),
        Token::Str("end"),
        Token::U32(8),
        Token::Str("attributes"),
        Token::Map { len: Some(1) },
        Token::Str("authorship"),
        Token::I64(1),
        Token::MapEnd,
        Token::StructEnd,
      ],
    );
    assert_eq!(expected.attr("authorship"), Some(&AttrValue::Int(1)));
  }

  #[test]
  fn deserialization_revalidates_bounds() {
    assert_de_tokens_error::<PositionRange>(
      &[
        Token::Struct {
          name: "PositionRange",
          len: 3,
        },
        Token::Str("begin"),
        Token::U32(5),
        Token::Str("end"),
        Token::U32(2),
        Token::Str("attributes"),
        Token::Map { len: Some(0) },
        Token::MapEnd,
        Token::StructEnd,
      ],
      "position range out of bounds: 5,2",
    );
  }
}
