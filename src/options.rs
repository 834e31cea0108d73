//! Packing policies.
//!
//! - [`PackOptions`]: main configuration struct
//! - [`Overflow`]: what to do with integers that do not fit their field
//! - [`LongStrings`]: what to do with dynamic strings longer than 255 bytes
//!
//! ## Examples
//!
//! ```rust
//! use finstruct::{pack_with_options, values, Overflow, PackOptions};
//!
//! // Default: out-of-range integers wrap modulo the field width
//! let bytes = pack_with_options("B", &values![300], PackOptions::new()).unwrap();
//! assert_eq!(bytes, [44]);
//!
//! // Strict: the same value is rejected
//! let strict = PackOptions::new().with_overflow(Overflow::Strict);
//! assert!(pack_with_options("B", &values![300], strict).is_err());
//! ```

/// Integer overflow policy.
///
/// - **Wrap**: truncate modulo `2^(8 * width)`, the compatible default
/// - **Strict**: fail with [`PackError::OutOfRange`](crate::PackError::OutOfRange)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Overflow {
    #[default]
    Wrap,
    Strict,
}

impl Overflow {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Overflow::Wrap => "wrap",
            Overflow::Strict => "strict",
        }
    }
}

/// Policy for dynamic (`S`) strings that exceed the one-byte length prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LongStrings {
    /// Fail with [`PackError::StringTooLong`](crate::PackError::StringTooLong).
    #[default]
    Reject,
    /// Keep the first 255 bytes.
    Truncate,
}

impl LongStrings {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            LongStrings::Reject => "reject",
            LongStrings::Truncate => "truncate",
        }
    }
}

/// Options for a single pack call.
///
/// # Examples
///
/// ```rust
/// use finstruct::{LongStrings, Overflow, PackOptions};
///
/// let options = PackOptions::strict().with_long_strings(LongStrings::Truncate);
/// assert_eq!(options.overflow, Overflow::Strict);
/// assert_eq!(options.long_strings, LongStrings::Truncate);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PackOptions {
    pub overflow: Overflow,
    pub long_strings: LongStrings,
}

impl PackOptions {
    /// Creates default options (wrapping integers, rejecting long dynamic strings).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that reject out-of-range integers.
    #[must_use]
    pub fn strict() -> Self {
        PackOptions {
            overflow: Overflow::Strict,
            ..Default::default()
        }
    }

    /// Sets the integer overflow policy.
    #[must_use]
    pub fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }

    /// Sets the policy for dynamic strings longer than 255 bytes.
    #[must_use]
    pub fn with_long_strings(mut self, long_strings: LongStrings) -> Self {
        self.long_strings = long_strings;
        self
    }
}
