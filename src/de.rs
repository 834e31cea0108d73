//! Rebuilding Rust values from canonical values.
//!
//! [`ValuesDeserializer`] is the inverse of
//! [`ValuesSerializer`](crate::ValuesSerializer): it consumes a flat list of
//! [`Value`]s in order, handing one value to each scalar leaf of the target
//! type. Byte sequences are decoded as UTF-8 wherever a `String`, `&str` or
//! `char` is requested.
//!
//! ## Examples
//!
//! ```rust
//! use finstruct::{from_values, values};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Login { user: String, attempts: u8 }
//!
//! let login: Login = from_values(values!["fin", 3u8]).unwrap();
//! assert_eq!(login, Login { user: "fin".to_string(), attempts: 3 });
//! ```

use crate::{Error, Result, Value};
use serde::{de, forward_to_deserialize_any};

/// Deserializer reading from a flat list of canonical values.
pub struct ValuesDeserializer {
    values: std::vec::IntoIter<Value>,
}

impl ValuesDeserializer {
    pub fn new(values: Vec<Value>) -> Self {
        ValuesDeserializer {
            values: values.into_iter(),
        }
    }

    /// Number of values not consumed yet.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    fn next_value(&mut self) -> Result<Value> {
        self.values
            .next()
            .ok_or_else(|| Error::custom("ran out of values"))
    }

    /// Ensures every value was consumed.
    pub fn end(&self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(Error::TrailingValues(n)),
        }
    }
}

fn visit_value<'de, V>(value: Value, visitor: V) -> Result<V::Value>
where
    V: de::Visitor<'de>,
{
    match value {
        Value::Int(i) => visitor.visit_i64(i),
        Value::UInt(u) => visitor.visit_u64(u),
        Value::Float(f) => visitor.visit_f64(f),
        Value::Bool(b) => visitor.visit_bool(b),
        Value::Bytes(b) => visitor.visit_byte_buf(b),
    }
}

fn utf8(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|e| Error::custom(format!("invalid UTF-8 in string field: {}", e)))
}

impl<'de, 'a> de::Deserializer<'de> for &'a mut ValuesDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visit_value(self.next_value()?, visitor)
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.next_value()? {
            // a `B` field used as a flag
            value @ (Value::Int(_) | Value::UInt(_)) => visitor.visit_bool(value.is_truthy()),
            value => visit_value(value, visitor),
        }
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.next_value()? {
            Value::Bytes(b) => {
                let s = utf8(b)?;
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => visitor.visit_char(c),
                    _ => visitor.visit_string(s),
                }
            }
            value => visit_value(value, visitor),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.next_value()? {
            Value::Bytes(b) => visitor.visit_string(utf8(b)?),
            value => visit_value(value, visitor),
        }
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_any(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_any(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_unit<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type("unit"))
    }

    fn deserialize_unit_struct<V>(self, name: &'static str, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type(name))
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_seq(FlatAccess::new(self, None))
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_seq(FlatAccess::new(self, Some(len)))
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_seq(FlatAccess::new(self, Some(len)))
    }

    fn deserialize_map<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type("map"))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_seq(FlatAccess::new(self, Some(fields.len())))
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        _variants: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type(&format!("enum {}", name)))
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.next_value()?;
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64
    }
}

/// Sequence access over the shared flat list.
///
/// With a known length it yields exactly that many elements; without one
/// (a `Vec<T>` field) it drains every remaining value.
struct FlatAccess<'a> {
    de: &'a mut ValuesDeserializer,
    remaining: Option<usize>,
}

impl<'a> FlatAccess<'a> {
    fn new(de: &'a mut ValuesDeserializer, remaining: Option<usize>) -> Self {
        FlatAccess { de, remaining }
    }
}

impl<'de, 'a> de::SeqAccess<'de> for FlatAccess<'a> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.remaining {
            Some(0) => return Ok(None),
            Some(n) => self.remaining = Some(n - 1),
            None if self.de.remaining() == 0 => return Ok(None),
            None => {}
        }
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use crate::{from_values, values, Error, Value};
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Inner(i16, u8);

    #[derive(Deserialize, Debug, PartialEq)]
    struct Outer {
        inner: Inner,
        name: String,
        initial: char,
        flag: bool,
        ratio: f32,
        note: Option<String>,
    }

    #[test]
    fn test_nested_struct() {
        let outer: Outer =
            from_values(values![-3, 4u8, "fin", "f", true, 0.25, "hi"]).unwrap();
        assert_eq!(
            outer,
            Outer {
                inner: Inner(-3, 4),
                name: "fin".to_string(),
                initial: 'f',
                flag: true,
                ratio: 0.25,
                note: Some("hi".to_string()),
            }
        );
    }

    #[test]
    fn test_tuple_and_vec() {
        let t: (u32, String) = from_values(values![7u32, "x"]).unwrap();
        assert_eq!(t, (7, "x".to_string()));

        let v: Vec<i64> = from_values(values![1, 2, 3]).unwrap();
        assert_eq!(v, vec![1, 2, 3]);
    }

    #[test]
    fn test_integer_flag() {
        let b: (bool, bool) = from_values(values![0u8, 1u8]).unwrap();
        assert_eq!(b, (false, true));
    }

    #[test]
    fn test_values_roundtrip() {
        let raw = values![-1, 2u8, 0.5, false, b"\xff"];
        let back: Vec<Value> = from_values(raw.clone()).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            from_values::<(u8,)>(values![1u8, 2u8]),
            Err(Error::TrailingValues(1))
        );
        assert!(from_values::<(u8, u8)>(values![1u8]).is_err());
        assert!(from_values::<String>(values![b"\xff"]).is_err());
        assert!(from_values::<u8>(values![300]).is_err());
    }
}
