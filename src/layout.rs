//! Format compilation and the compiled [`Layout`] handle.
//!
//! A format string is compiled once, in a single left-to-right pass, into an
//! ordered list of [`FieldCode`]s with resolved byte offsets. The resulting
//! layout is immutable and can be shared freely between threads; packing and
//! unpacking only read it.
//!
//! ## Examples
//!
//! ```rust
//! use finstruct::{values, Layout, Value};
//!
//! let layout = Layout::compile("<HxI").unwrap();
//! assert_eq!(layout.size(), 7);
//! assert_eq!(layout.len(), 2);
//!
//! let bytes = layout.pack(&values![1u16, 2u32]).unwrap();
//! assert_eq!(bytes, [1, 0, 0, 2, 0, 0, 0]);
//! assert_eq!(layout.unpack(&bytes).unwrap(), vec![Value::UInt(1), Value::UInt(2)]);
//! ```

use crate::descriptor::{self, FieldDescriptor, FieldKind};
use crate::{FormatError, PackError, PackOptions, UnpackError, Value};
use tracing::trace;

/// One compiled field: a descriptor placed at a byte offset.
///
/// For `s`, `p` and `x` the `count` is the byte capacity. Every other kind is
/// expanded into one code per repetition, each with a `count` of one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldCode {
    pub descriptor: &'static FieldDescriptor,
    pub offset: usize,
    pub count: usize,
}

impl FieldCode {
    #[inline]
    #[must_use]
    pub fn tag(&self) -> char {
        self.descriptor.tag
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.descriptor.kind
    }

    /// Bytes this field occupies in the static region.
    #[inline]
    #[must_use]
    pub fn static_size(&self) -> usize {
        self.descriptor.width * self.count
    }
}

/// A compiled format string.
///
/// Created with [`Layout::compile`] or, through the cache, with
/// [`LayoutCache::get_or_compile`](crate::LayoutCache::get_or_compile).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    format: String,
    fields: Vec<FieldCode>,
    size: usize,
    len: usize,
    dynamic: bool,
}

struct Compiler {
    fields: Vec<FieldCode>,
    offset: usize,
    len: usize,
    dynamic: bool,
}

impl Compiler {
    fn new() -> Self {
        Compiler {
            fields: Vec::new(),
            offset: 0,
            len: 0,
            dynamic: false,
        }
    }

    fn reserve(&mut self, count: usize) -> Result<(), FormatError> {
        self.fields
            .try_reserve(count)
            .map_err(|_| FormatError::TooManyFields { count })
    }

    fn align(&mut self, descriptor: &FieldDescriptor) -> Result<(), FormatError> {
        let alignment = descriptor.alignment;
        if alignment > 1 {
            let rem = self.offset % alignment;
            if rem != 0 {
                self.advance(alignment - rem)?;
            }
        }
        Ok(())
    }

    fn advance(&mut self, bytes: usize) -> Result<(), FormatError> {
        self.offset = self
            .offset
            .checked_add(bytes)
            .ok_or(FormatError::SizeOverflow)?;
        Ok(())
    }

    fn place(
        &mut self,
        descriptor: &'static FieldDescriptor,
        count: usize,
    ) -> Result<(), FormatError> {
        self.align(descriptor)?;
        let size = descriptor
            .width
            .checked_mul(count)
            .ok_or(FormatError::SizeOverflow)?;
        self.fields.push(FieldCode {
            descriptor,
            offset: self.offset,
            count,
        });
        if descriptor.kind.has_value() {
            self.len += 1;
        }
        if descriptor.kind == FieldKind::DynamicString {
            self.dynamic = true;
        }
        self.advance(size)
    }

    fn expand(
        &mut self,
        descriptor: &'static FieldDescriptor,
        count: usize,
    ) -> Result<(), FormatError> {
        match descriptor.kind {
            FieldKind::Pad => {
                if count > 0 {
                    self.place(descriptor, count)?;
                }
            }
            FieldKind::FixedBytes | FieldKind::PascalString => self.place(descriptor, count)?,
            FieldKind::DynamicString => {
                self.reserve(count)?;
                for _ in 0..count {
                    self.place(descriptor, 1)?;
                }
            }
            FieldKind::SignedInt
            | FieldKind::UnsignedInt
            | FieldKind::Float32
            | FieldKind::Float64
            | FieldKind::Bool
            | FieldKind::Char => {
                // Reject impossible sizes before materializing the codes
                descriptor
                    .width
                    .checked_mul(count)
                    .and_then(|total| self.offset.checked_add(total))
                    .ok_or(FormatError::SizeOverflow)?;
                self.reserve(count)?;
                for _ in 0..count {
                    self.place(descriptor, 1)?;
                }
            }
        }
        Ok(())
    }
}

impl Layout {
    /// Compiles a format string.
    ///
    /// Whitespace is ignored anywhere. A decimal count before a tag repeats
    /// it (or, for `s`, `p` and `x`, sets the byte capacity). A single
    /// leading `<` is accepted and means little-endian, the only byte order.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] for unknown tags, a count that overflows, a
    /// trailing count with no tag, or a total size that overflows.
    pub fn compile(format: &str) -> Result<Layout, FormatError> {
        let mut compiler = Compiler::new();
        let mut pending: Option<(usize, usize)> = None;
        let mut seen_tag = false;

        for (position, ch) in format.char_indices() {
            if ch.is_whitespace() {
                continue;
            }

            if let Some(digit) = ch.to_digit(10) {
                let (start, count) = pending.unwrap_or((position, 0));
                let count = count
                    .checked_mul(10)
                    .and_then(|c| c.checked_add(digit as usize))
                    .ok_or(FormatError::CountOverflow { position: start })?;
                pending = Some((start, count));
                continue;
            }

            if ch == '<' && !seen_tag && pending.is_none() {
                seen_tag = true;
                continue;
            }
            seen_tag = true;

            let descriptor = descriptor::lookup(ch).ok_or(FormatError::UnknownTag {
                tag: ch,
                position,
            })?;
            let count = pending.take().map_or(1, |(_, count)| count);
            compiler.expand(descriptor, count)?;
        }

        if let Some((position, _)) = pending {
            return Err(FormatError::DanglingCount { position });
        }

        let layout = Layout {
            format: format.to_string(),
            fields: compiler.fields,
            size: compiler.offset,
            len: compiler.len,
            dynamic: compiler.dynamic,
        };
        trace!(
            format = %layout.format,
            size = layout.size,
            len = layout.len,
            dynamic = layout.dynamic,
            "compiled layout"
        );
        Ok(layout)
    }

    /// The format string this layout was compiled from.
    #[must_use]
    pub fn format(&self) -> &str {
        &self.format
    }

    /// The compiled fields, in declaration order, pad fields included.
    #[must_use]
    pub fn fields(&self) -> &[FieldCode] {
        &self.fields
    }

    /// Bytes occupied by fixed-size fields; dynamic string content is excluded.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of values taken by [`pack`](Self::pack) and returned by
    /// [`unpack`](Self::unpack). Pad fields are not counted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if the layout contains a dynamic string.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// Exact number of bytes [`pack`](Self::pack) would produce for `values`.
    ///
    /// # Errors
    ///
    /// Fails like `pack` on arity and dynamic-string errors.
    pub fn packed_size(&self, values: &[Value]) -> Result<usize, PackError> {
        crate::pack::packed_size(self, values, &PackOptions::default())
    }

    /// Packs values with the default options.
    ///
    /// # Errors
    ///
    /// Returns [`PackError`] on arity or type mismatches.
    pub fn pack(&self, values: &[Value]) -> Result<Vec<u8>, PackError> {
        self.pack_with_options(values, &PackOptions::default())
    }

    /// Packs values with explicit overflow and long-string policies.
    ///
    /// # Errors
    ///
    /// Returns [`PackError`] on arity or type mismatches, and on out-of-range
    /// integers when [`Overflow::Strict`](crate::Overflow::Strict) is selected.
    pub fn pack_with_options(
        &self,
        values: &[Value],
        options: &PackOptions,
    ) -> Result<Vec<u8>, PackError> {
        let mut out = Vec::new();
        crate::pack::pack_into(self, values, options, &mut out)?;
        Ok(out)
    }

    /// Appends one packed record to `out` and returns the bytes written.
    ///
    /// On failure `out` is left exactly as it was.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use finstruct::{values, Layout, PackOptions};
    ///
    /// let layout = Layout::compile("BS").unwrap();
    /// let mut out = Vec::new();
    /// layout.pack_into(&mut out, &values![1u8, "a"], &PackOptions::new()).unwrap();
    /// layout.pack_into(&mut out, &values![2u8, "bc"], &PackOptions::new()).unwrap();
    /// assert_eq!(out, [1, 1, b'a', 2, 2, b'b', b'c']);
    /// ```
    ///
    /// # Errors
    ///
    /// Same as [`pack_with_options`](Self::pack_with_options).
    pub fn pack_into(
        &self,
        out: &mut Vec<u8>,
        values: &[Value],
        options: &PackOptions,
    ) -> Result<usize, PackError> {
        crate::pack::pack_into(self, values, options, out)
    }

    /// Unpacks a buffer that holds exactly one record.
    ///
    /// # Errors
    ///
    /// Returns [`UnpackError::SizeMismatch`] if the buffer length is wrong and
    /// [`UnpackError::Truncated`] if a dynamic field runs past the end.
    pub fn unpack(&self, buffer: &[u8]) -> Result<Vec<Value>, UnpackError> {
        crate::unpack::unpack(self, buffer)
    }

    /// Unpacks one record from the start of `buffer`, returning the values and
    /// the number of bytes consumed. Trailing bytes are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`UnpackError::Truncated`] if the buffer is too short.
    pub fn unpack_prefix(&self, buffer: &[u8]) -> Result<(Vec<Value>, usize), UnpackError> {
        crate::unpack::unpack_prefix(self, buffer)
    }

    /// Iterates over back-to-back records in `buffer`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use finstruct::{Layout, Value};
    ///
    /// let layout = Layout::compile("S").unwrap();
    /// let records: Vec<_> = layout
    ///     .iter_unpack(&[1, b'a', 0])
    ///     .collect::<Result<_, _>>()
    ///     .unwrap();
    /// assert_eq!(records, vec![vec![Value::from("a")], vec![Value::from("")]]);
    /// ```
    pub fn iter_unpack<'a>(&'a self, buffer: &'a [u8]) -> crate::unpack::RecordIter<'a> {
        crate::unpack::RecordIter::new(self, buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(layout: &Layout) -> String {
        layout.fields().iter().map(FieldCode::tag).collect()
    }

    #[test]
    fn test_scalar_sizes() {
        let layout = Layout::compile("bBhHiIlLqQfd?c").unwrap();
        assert_eq!(layout.size(), 1 + 1 + 2 + 2 + 4 + 4 + 4 + 4 + 8 + 8 + 4 + 8 + 1 + 1);
        assert_eq!(layout.len(), 14);
        assert!(!layout.is_dynamic());
    }

    #[test]
    fn test_repeat_counts_expand_scalars() {
        let layout = Layout::compile("3H").unwrap();
        assert_eq!(tags(&layout), "HHH");
        let offsets: Vec<_> = layout.fields().iter().map(|f| f.offset).collect();
        assert_eq!(offsets, vec![0, 2, 4]);
        assert_eq!(layout.size(), 6);
    }

    #[test]
    fn test_string_counts_are_capacity() {
        let layout = Layout::compile("10s5p").unwrap();
        assert_eq!(layout.len(), 2);
        assert_eq!(layout.size(), 15);
        assert_eq!(layout.fields()[0].count, 10);
        assert_eq!(layout.fields()[1].offset, 10);
    }

    #[test]
    fn test_pad_takes_space_but_no_value() {
        let layout = Layout::compile("B3xB").unwrap();
        assert_eq!(layout.len(), 2);
        assert_eq!(layout.size(), 5);
        assert_eq!(layout.fields()[2].offset, 4);
    }

    #[test]
    fn test_dynamic_strings() {
        let layout = Layout::compile("SI2S").unwrap();
        assert!(layout.is_dynamic());
        assert_eq!(layout.size(), 4);
        assert_eq!(layout.len(), 4);
        assert_eq!(tags(&layout), "SISS");
    }

    #[test]
    fn test_whitespace_and_prefix() {
        let a = Layout::compile("< 2 h  I").unwrap();
        let b = Layout::compile("2hI").unwrap();
        assert_eq!(a.fields(), b.fields());
        assert_eq!(a.format(), "< 2 h  I");
    }

    #[test]
    fn test_zero_counts() {
        let layout = Layout::compile("0i0x0s").unwrap();
        assert_eq!(layout.size(), 0);
        assert_eq!(layout.len(), 1);
    }

    #[test]
    fn test_empty_format() {
        let layout = Layout::compile("").unwrap();
        assert!(layout.is_empty());
        assert_eq!(layout.size(), 0);
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(
            Layout::compile("iz"),
            Err(FormatError::UnknownTag {
                tag: 'z',
                position: 1
            })
        );
        assert!(matches!(
            Layout::compile(">i"),
            Err(FormatError::UnknownTag { tag: '>', .. })
        ));
        assert!(matches!(
            Layout::compile("i<"),
            Err(FormatError::UnknownTag { tag: '<', .. })
        ));
    }

    #[test]
    fn test_count_overflow() {
        let format = format!("{}0B", usize::MAX);
        assert_eq!(
            Layout::compile(&format),
            Err(FormatError::CountOverflow { position: 0 })
        );
    }

    #[test]
    fn test_size_overflow() {
        let format = format!("{}q", usize::MAX / 4);
        assert_eq!(Layout::compile(&format), Err(FormatError::SizeOverflow));

        let format = format!("{}s{}s", usize::MAX, 1);
        assert_eq!(Layout::compile(&format), Err(FormatError::SizeOverflow));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_huge_repeat_count_is_an_error() {
        assert_eq!(
            Layout::compile("1000000000000000B"),
            Err(FormatError::TooManyFields {
                count: 1_000_000_000_000_000
            })
        );
        assert!(matches!(
            Layout::compile("B1000000000000000S"),
            Err(FormatError::TooManyFields { .. })
        ));
    }

    #[test]
    fn test_alignment_pads_to_boundary() {
        static BYTE: FieldDescriptor = FieldDescriptor {
            tag: 'B',
            width: 1,
            alignment: 0,
            kind: FieldKind::UnsignedInt,
        };
        static WORD: FieldDescriptor = FieldDescriptor {
            tag: 'I',
            width: 4,
            alignment: 4,
            kind: FieldKind::UnsignedInt,
        };

        let mut compiler = Compiler::new();
        compiler.place(&BYTE, 1).unwrap();
        compiler.place(&WORD, 1).unwrap();
        assert_eq!(compiler.fields[1].offset, 4);
        assert_eq!(compiler.offset, 8);

        // already on a boundary: no padding
        compiler.place(&WORD, 1).unwrap();
        assert_eq!(compiler.fields[2].offset, 8);
        assert_eq!(compiler.offset, 12);
    }

    #[test]
    fn test_dangling_count() {
        assert_eq!(
            Layout::compile("I12"),
            Err(FormatError::DanglingCount { position: 1 })
        );
    }

    #[test]
    fn test_offsets_non_decreasing() {
        let layout = Layout::compile("b2x3sHpSqd").unwrap();
        let offsets: Vec<_> = layout.fields().iter().map(|f| f.offset).collect();
        assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
        let last = layout.fields().last().unwrap();
        assert_eq!(last.offset + last.static_size(), layout.size());
    }
}
