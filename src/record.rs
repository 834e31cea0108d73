//! Named records.
//!
//! A [`Record`] gives names to the fields of a layout, so values can be
//! packed from and unpacked into a [`RecordMap`] or any serde type instead of
//! a positional list. The format string is generated from the declared
//! fields; declaration order is wire order.
//!
//! ## Examples
//!
//! ```rust
//! use finstruct::record::{FieldType, Record};
//! use finstruct::RecordMap;
//!
//! let chat = Record::builder("ChatMessage")
//!     .field("name", FieldType::Bytes(18))
//!     .field("ip", FieldType::Bytes(15))
//!     .field("message", FieldType::Dynamic)
//!     .build()
//!     .unwrap();
//! assert_eq!(chat.format(), "18s15sS");
//!
//! let mut msg = RecordMap::new();
//! msg.insert("name", "fin");
//! msg.insert("ip", "10.0.0.1");
//! msg.insert("message", "hello");
//!
//! let bytes = chat.pack_map(&msg).unwrap();
//! let back = chat.unpack_map(&bytes).unwrap();
//! assert_eq!(back.get("message").and_then(|v| v.as_str()), Some("hello"));
//! ```

use crate::de::ValuesDeserializer;
use crate::{Error, Layout, PackOptions, RecordMap, Result, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// The wire type of a named field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    Bool,
    Char,
    /// Fixed-capacity raw bytes (`s`).
    Bytes(usize),
    /// Length-prefixed bytes within a fixed capacity (`p`).
    Pascal(usize),
    /// Length-prefixed bytes sized per record (`S`).
    Dynamic,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Int8 => f.write_str("b"),
            FieldType::UInt8 => f.write_str("B"),
            FieldType::Int16 => f.write_str("h"),
            FieldType::UInt16 => f.write_str("H"),
            FieldType::Int32 => f.write_str("i"),
            FieldType::UInt32 => f.write_str("I"),
            FieldType::Int64 => f.write_str("q"),
            FieldType::UInt64 => f.write_str("Q"),
            FieldType::Float32 => f.write_str("f"),
            FieldType::Float64 => f.write_str("d"),
            FieldType::Bool => f.write_str("?"),
            FieldType::Char => f.write_str("c"),
            FieldType::Bytes(n) => write!(f, "{}s", n),
            FieldType::Pascal(n) => write!(f, "{}p", n),
            FieldType::Dynamic => f.write_str("S"),
        }
    }
}

/// Builder for [`Record`], created by [`Record::builder`].
#[derive(Clone, Debug)]
pub struct RecordBuilder {
    name: String,
    names: Vec<String>,
    format: String,
}

impl RecordBuilder {
    /// Appends a named field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.names.push(name.into());
        self.format.push_str(&ty.to_string());
        self
    }

    /// Appends `n` anonymous zero bytes.
    #[must_use]
    pub fn pad(mut self, n: usize) -> Self {
        if n > 0 {
            self.format.push_str(&format!("{}x", n));
        }
        self
    }

    /// Compiles the record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateField`] if a name is declared twice, or the
    /// compile error of the generated format.
    pub fn build(self) -> Result<Record> {
        for (i, name) in self.names.iter().enumerate() {
            if self.names[..i].contains(name) {
                return Err(Error::DuplicateField(name.clone()));
            }
        }
        let layout = Layout::compile(&self.format)?;
        Ok(Record {
            name: self.name,
            names: self.names,
            layout,
        })
    }
}

/// A compiled layout with named fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    name: String,
    names: Vec<String>,
    layout: Layout,
}

impl Record {
    pub fn builder(name: impl Into<String>) -> RecordBuilder {
        RecordBuilder {
            name: name.into(),
            names: Vec::new(),
            format: String::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field names in wire order.
    #[must_use]
    pub fn field_names(&self) -> &[String] {
        &self.names
    }

    /// The generated format string.
    #[must_use]
    pub fn format(&self) -> &str {
        self.layout.format()
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Static size in bytes, see [`Layout::size`].
    #[must_use]
    pub fn size(&self) -> usize {
        self.layout.size()
    }

    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.layout.is_dynamic()
    }

    /// Packs positional values in field order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pack`] on arity or type mismatches.
    pub fn pack(&self, values: &[Value]) -> Result<Vec<u8>> {
        Ok(self.layout.pack(values)?)
    }

    /// Unpacks into positional values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unpack`] if the buffer does not hold one record.
    pub fn unpack(&self, buffer: &[u8]) -> Result<Vec<Value>> {
        Ok(self.layout.unpack(buffer)?)
    }

    /// Packs from a map keyed by field name. Extra keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] for the first field with no entry.
    pub fn pack_map(&self, map: &RecordMap) -> Result<Vec<u8>> {
        self.pack_map_with_options(map, &PackOptions::default())
    }

    /// Packs from a map with explicit options.
    ///
    /// # Errors
    ///
    /// Same as [`pack_map`](Self::pack_map), plus policy errors.
    pub fn pack_map_with_options(
        &self,
        map: &RecordMap,
        options: &PackOptions,
    ) -> Result<Vec<u8>> {
        let values = self
            .names
            .iter()
            .map(|name| {
                map.get(name)
                    .cloned()
                    .ok_or_else(|| Error::MissingField(name.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self.layout.pack_with_options(&values, options)?)
    }

    /// Unpacks into a map keyed by field name, in wire order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unpack`] if the buffer does not hold one record.
    pub fn unpack_map(&self, buffer: &[u8]) -> Result<RecordMap> {
        let values = self.layout.unpack(buffer)?;
        Ok(self.names.iter().cloned().zip(values).collect())
    }

    /// Packs any serializable value whose fields flatten to this record.
    ///
    /// # Errors
    ///
    /// Returns serde bridge errors or [`Error::Pack`].
    pub fn pack_struct<T>(&self, value: &T) -> Result<Vec<u8>>
    where
        T: ?Sized + Serialize,
    {
        let values = crate::to_values(value)?;
        Ok(self.layout.pack(&values)?)
    }

    /// Unpacks into any deserializable value whose fields match this record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unpack`] or serde bridge errors.
    pub fn unpack_struct<T>(&self, buffer: &[u8]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let values = self.layout.unpack(buffer)?;
        let mut de = ValuesDeserializer::new(values);
        let value = T::deserialize(&mut de)?;
        de.end()?;
        Ok(value)
    }
}
