//! Error types for format compilation, packing and unpacking.
//!
//! Each phase of the codec has its own error enum so callers can tell exactly
//! where a failure originated:
//!
//! - [`FormatError`]: raised only while compiling a format string
//! - [`PackError`]: raised only while packing values into bytes
//! - [`UnpackError`]: raised only while unpacking bytes into values
//!
//! The crate-level [`Error`] wraps all three and adds the failures of the
//! record and serde layers. Every error is returned to the immediate caller;
//! nothing is retried and a failed call never leaves a partial buffer behind.
//!
//! ## Examples
//!
//! ```rust
//! use finstruct::{pack, Error, FormatError, Value};
//!
//! let err = pack("3z", &[Value::from(1u8)]).unwrap_err();
//! assert!(matches!(
//!     err,
//!     Error::Format(FormatError::UnknownTag { tag: 'z', position: 1 })
//! ));
//! ```

use std::fmt;
use thiserror::Error;

/// Failure while compiling a format string into a layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// A character that is neither whitespace, a digit, nor a known type tag.
    #[error("bad char in format at position {position}: {tag:?}")]
    UnknownTag { tag: char, position: usize },

    /// A repeat count that does not fit in the platform size type.
    #[error("repeat count starting at position {position} is too large")]
    CountOverflow { position: usize },

    /// Digits at the end of the format with no type tag after them.
    #[error("repeat count at position {position} is not followed by a type tag")]
    DanglingCount { position: usize },

    /// The total static size of the layout overflows the platform size type.
    #[error("total format size overflows the platform size type")]
    SizeOverflow,

    /// The repeat counts expand to more field codes than can be allocated.
    #[error("format expands to {count} fields, more than can be allocated")]
    TooManyFields { count: usize },
}

/// Failure while packing values into a buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackError {
    /// The number of values differs from the number of value-carrying fields.
    #[error("pack requires exactly {expected} values, got {found}")]
    ArityMismatch { expected: usize, found: usize },

    /// A value whose kind cannot be stored in the field.
    #[error("field '{tag}' expects {expected}, found {found}")]
    TypeMismatch {
        tag: char,
        expected: &'static str,
        found: &'static str,
    },

    /// An integer outside the field's range while the strict policy is active.
    #[error("field '{tag}' requires {min} <= number <= {max}, got {value}")]
    OutOfRange {
        tag: char,
        value: i128,
        min: i128,
        max: i128,
    },

    /// A dynamic string longer than its one-byte length prefix can describe.
    #[error("field '{tag}' holds at most {max} bytes, got {len}")]
    StringTooLong { tag: char, len: usize, max: usize },

    /// The packed size overflows the platform size type.
    #[error("packed size overflows the platform size type")]
    SizeOverflow,
}

/// Failure while unpacking a buffer into values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnpackError {
    /// The buffer length differs from the layout size.
    #[error("unpack requires a buffer of {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// The buffer ended before a field could be read completely.
    #[error("buffer truncated: needed {needed} bytes, only {available} available")]
    Truncated { needed: usize, available: usize },
}

/// Represents all possible errors returned by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Pack(#[from] PackError),

    #[error(transparent)]
    Unpack(#[from] UnpackError),

    /// A record field that was not supplied when packing from a map.
    #[error("missing value for field '{0}'")]
    MissingField(String),

    /// Two record fields declared with the same name.
    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),

    /// A Rust type the serde bridge cannot flatten into canonical values.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// Values left over after rebuilding a Rust value.
    #[error("{0} values left over after deserialization")]
    TrailingValues(usize),

    /// Custom error
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates an unsupported type error for types the serde bridge rejects.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use finstruct::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
