//! The static field descriptor table.
//!
//! Every type tag recognized in a format string maps to one
//! [`FieldDescriptor`] describing its width, alignment and [`FieldKind`].
//! The pack and unpack engines dispatch on the kind with exhaustive matches.

/// What a field stores and how it is encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    SignedInt,
    UnsignedInt,
    Float32,
    Float64,
    Bool,
    Char,
    /// `s`: raw bytes with a fixed capacity.
    FixedBytes,
    /// `p`: a length byte plus up to `capacity - 1` data bytes.
    PascalString,
    /// `S`: a length byte plus data, sized per call.
    DynamicString,
    /// `x`: zero bytes that carry no value.
    Pad,
}

impl FieldKind {
    /// Returns `true` if fields of this kind take a value when packing.
    #[inline]
    #[must_use]
    pub const fn has_value(&self) -> bool {
        !matches!(self, FieldKind::Pad)
    }

    /// Human-readable description used in error messages.
    #[must_use]
    pub const fn expects(&self) -> &'static str {
        match self {
            FieldKind::SignedInt | FieldKind::UnsignedInt => "an integer",
            FieldKind::Float32 | FieldKind::Float64 => "a number",
            FieldKind::Bool => "any value",
            FieldKind::Char => "a byte sequence of length 1",
            FieldKind::FixedBytes | FieldKind::PascalString | FieldKind::DynamicString => {
                "a byte sequence"
            }
            FieldKind::Pad => "no value",
        }
    }
}

/// Static description of one type tag.
///
/// `width` is the number of bytes per unit of the repeat count: the full
/// width for scalars, one byte of capacity for `s`, `p` and `x`, and zero for
/// the dynamic `S`. An `alignment` of zero means the field is byte-packed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub tag: char,
    pub width: usize,
    pub alignment: usize,
    pub kind: FieldKind,
}

const fn entry(tag: char, width: usize, kind: FieldKind) -> FieldDescriptor {
    FieldDescriptor {
        tag,
        width,
        alignment: 0,
        kind,
    }
}

/// All recognized type tags. Multi-byte scalars are little-endian.
pub static DESCRIPTORS: [FieldDescriptor; 18] = [
    entry('x', 1, FieldKind::Pad),
    entry('c', 1, FieldKind::Char),
    entry('b', 1, FieldKind::SignedInt),
    entry('B', 1, FieldKind::UnsignedInt),
    entry('?', 1, FieldKind::Bool),
    entry('h', 2, FieldKind::SignedInt),
    entry('H', 2, FieldKind::UnsignedInt),
    entry('i', 4, FieldKind::SignedInt),
    entry('I', 4, FieldKind::UnsignedInt),
    entry('l', 4, FieldKind::SignedInt),
    entry('L', 4, FieldKind::UnsignedInt),
    entry('q', 8, FieldKind::SignedInt),
    entry('Q', 8, FieldKind::UnsignedInt),
    entry('f', 4, FieldKind::Float32),
    entry('d', 8, FieldKind::Float64),
    entry('s', 1, FieldKind::FixedBytes),
    entry('p', 1, FieldKind::PascalString),
    entry('S', 0, FieldKind::DynamicString),
];

/// Looks up the descriptor for a type tag.
///
/// # Examples
///
/// ```rust
/// use finstruct::descriptor::{lookup, FieldKind};
///
/// let d = lookup('H').unwrap();
/// assert_eq!(d.width, 2);
/// assert_eq!(d.kind, FieldKind::UnsignedInt);
/// assert!(lookup('z').is_none());
/// ```
#[must_use]
pub fn lookup(tag: char) -> Option<&'static FieldDescriptor> {
    DESCRIPTORS.iter().find(|d| d.tag == tag)
}
