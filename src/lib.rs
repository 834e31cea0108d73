//! # finstruct
//!
//! A format-string driven binary codec: pack values into compact
//! little-endian records and unpack them again, with length-prefixed dynamic
//! strings that grow the record to fit.
//!
//! ## Key Features
//!
//! - **Familiar format strings**: `b B h H i I l L q Q f d ? c x s p`, with
//!   decimal repeat counts and byte capacities
//! - **Dynamic strings**: the `S` tag stores a length byte and the content,
//!   shifting every later field
//! - **Compiled layouts**: each format string is compiled once and cached in
//!   a bounded, thread-safe cache
//! - **Wrap or strict integers**: out-of-range integers wrap by default, or
//!   fail under [`Overflow::Strict`]
//! - **Named records and serde**: pack a struct or a [`RecordMap`] through a
//!   [`Record`], or flatten any `Serialize` type with [`to_values`]
//!
//! ## Quick Start
//!
//! ```rust
//! use finstruct::{calcsize, pack, unpack, values, Value};
//!
//! assert_eq!(calcsize("HHI").unwrap(), 8);
//!
//! let bytes = pack("HHI", &values![1u16, 2u16, 3u32]).unwrap();
//! assert_eq!(bytes, [1, 0, 2, 0, 3, 0, 0, 0]);
//!
//! let back = unpack("HHI", &bytes).unwrap();
//! assert_eq!(back, vec![Value::UInt(1), Value::UInt(2), Value::UInt(3)]);
//! ```
//!
//! ### Dynamic Strings
//!
//! ```rust
//! use finstruct::{pack, unpack, values};
//!
//! let bytes = pack("BSH", &values![1u8, "hey", 2u16]).unwrap();
//! assert_eq!(bytes, [1, 3, b'h', b'e', b'y', 2, 0]);
//! assert_eq!(unpack("BSH", &bytes).unwrap(), values![1u8, "hey", 2u16]);
//! ```
//!
//! ### Structs
//!
//! ```rust
//! use finstruct::{pack_struct, unpack_struct};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Tick { symbol: String, price: f64, qty: u32 }
//!
//! let tick = Tick { symbol: "ACME".to_string(), price: 12.5, qty: 300 };
//! let bytes = pack_struct("SdI", &tick).unwrap();
//! let back: Tick = unpack_struct("SdI", &bytes).unwrap();
//! assert_eq!(tick, back);
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events: `trace` for each compiled layout and
//! `debug` for layout cache misses and clears. No subscriber is installed.
//!
//! ## Format Reference
//!
//! See the [`grammar`] module for the full format language and wire format.
//!
//! ## Examples
//!
//! The `demos/` directory holds runnable examples:
//!
//! - **`simple.rs`** - packing and unpacking positional values
//! - **`macro.rs`** - building value lists with `values!`
//! - **`dynamic_strings.rs`** - records with `S` fields
//! - **`records.rs`** - named records, maps and structs
//! - **`strict_mode.rs`** - overflow and long-string policies
//!
//! Run any example with: `cargo run --example <name>`

pub mod cache;
pub mod de;
pub mod descriptor;
pub mod error;
pub mod grammar;
pub mod layout;
pub mod macros;
pub mod map;
pub mod options;
pub mod pack;
pub mod record;
pub mod ser;
pub mod unpack;
pub mod value;

pub use cache::{LayoutCache, DEFAULT_CAPACITY};
pub use de::ValuesDeserializer;
pub use error::{Error, FormatError, PackError, Result, UnpackError};
pub use layout::{FieldCode, Layout};
pub use map::RecordMap;
pub use options::{LongStrings, Overflow, PackOptions};
pub use record::{FieldType, Record, RecordBuilder};
pub use ser::ValuesSerializer;
pub use unpack::RecordIter;
pub use value::Value;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Returns the static size in bytes of a format.
///
/// Dynamic string content is not included; each `S` contributes zero.
///
/// # Examples
///
/// ```rust
/// use finstruct::calcsize;
///
/// assert_eq!(calcsize("18s15sS").unwrap(), 33);
/// assert_eq!(calcsize("").unwrap(), 0);
/// ```
///
/// # Errors
///
/// Returns [`Error::Format`] if the format does not compile.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn calcsize(format: &str) -> Result<usize> {
    Ok(LayoutCache::global().get_or_compile(format)?.size())
}

/// Packs values according to a format, using the default options.
///
/// # Examples
///
/// ```rust
/// use finstruct::{pack, values};
///
/// let bytes = pack("bB", &values![-1, 300]).unwrap();
/// assert_eq!(bytes, [0xff, 44]);
/// ```
///
/// # Errors
///
/// Returns [`Error::Format`] if the format does not compile and
/// [`Error::Pack`] on arity or type mismatches.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn pack(format: &str, values: &[Value]) -> Result<Vec<u8>> {
    pack_with_options(format, values, PackOptions::default())
}

/// Packs values according to a format with explicit options.
///
/// # Examples
///
/// ```rust
/// use finstruct::{pack_with_options, values, Error, PackError, PackOptions};
///
/// let result = pack_with_options("B", &values![300], PackOptions::strict());
/// assert!(matches!(result, Err(Error::Pack(PackError::OutOfRange { .. }))));
/// ```
///
/// # Errors
///
/// Same as [`pack`], plus policy errors selected by `options`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn pack_with_options(
    format: &str,
    values: &[Value],
    options: PackOptions,
) -> Result<Vec<u8>> {
    let layout = LayoutCache::global().get_or_compile(format)?;
    Ok(layout.pack_with_options(values, &options)?)
}

/// Unpacks a buffer holding exactly one record of the given format.
///
/// # Examples
///
/// ```rust
/// use finstruct::{unpack, Value};
///
/// let values = unpack("h?", &[0xfe, 0xff, 1]).unwrap();
/// assert_eq!(values, vec![Value::Int(-2), Value::Bool(true)]);
/// ```
///
/// # Errors
///
/// Returns [`Error::Format`] if the format does not compile and
/// [`Error::Unpack`] if the buffer does not match it.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn unpack(format: &str, buffer: &[u8]) -> Result<Vec<Value>> {
    let layout = LayoutCache::global().get_or_compile(format)?;
    Ok(layout.unpack(buffer)?)
}

/// Compiles a format without consulting or filling the global cache.
///
/// # Errors
///
/// Returns [`Error::Format`] if the format does not compile.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn compile(format: &str) -> Result<Layout> {
    Ok(Layout::compile(format)?)
}

/// Drops every layout held by the global cache.
pub fn clear_cache() {
    LayoutCache::global().clear();
}

/// Flattens any `T: Serialize` into a list of canonical values.
///
/// # Examples
///
/// ```rust
/// use finstruct::{to_values, Value};
///
/// let values = to_values(&(7u8, "x")).unwrap();
/// assert_eq!(values, vec![Value::UInt(7), Value::from("x")]);
/// ```
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] for maps, enums, unit values and `None`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_values<T>(value: &T) -> Result<Vec<Value>>
where
    T: ?Sized + Serialize,
{
    let mut serializer = ValuesSerializer::new();
    value.serialize(&mut serializer)?;
    Ok(serializer.into_inner())
}

/// Rebuilds a `T` from a list of canonical values. Every value must be used.
///
/// # Examples
///
/// ```rust
/// use finstruct::{from_values, values};
///
/// let pair: (i16, String) = from_values(values![-4, "ok"]).unwrap();
/// assert_eq!(pair, (-4, "ok".to_string()));
/// ```
///
/// # Errors
///
/// Returns an error if the values do not fit `T`, and
/// [`Error::TrailingValues`] if some are left over.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_values<T>(values: Vec<Value>) -> Result<T>
where
    T: DeserializeOwned,
{
    let mut deserializer = ValuesDeserializer::new(values);
    let value = T::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(value)
}

/// Packs any `T: Serialize` whose flattened values match the format.
///
/// # Errors
///
/// Returns serde bridge errors, [`Error::Format`] or [`Error::Pack`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn pack_struct<T>(format: &str, value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    pack(format, &to_values(value)?)
}

/// Unpacks one record of the format into any `T: DeserializeOwned`.
///
/// # Errors
///
/// Returns [`Error::Format`], [`Error::Unpack`] or serde bridge errors.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn unpack_struct<T>(format: &str, buffer: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_values(unpack(format, buffer)?)
}
