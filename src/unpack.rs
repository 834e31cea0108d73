//! The unpack engine, the inverse of [`pack`](crate::pack).
//!
//! Fields are read strictly in declaration order: the position of anything
//! after a dynamic string depends on the length byte embedded before it.

use crate::descriptor::FieldKind;
use crate::layout::Layout;
use crate::{UnpackError, Value};

struct Reader<'b> {
    buf: &'b [u8],
}

impl<'b> Reader<'b> {
    fn take(&self, pos: usize, n: usize) -> Result<&'b [u8], UnpackError> {
        pos.checked_add(n)
            .and_then(|end| self.buf.get(pos..end))
            .ok_or(UnpackError::Truncated {
                needed: pos.saturating_add(n),
                available: self.buf.len(),
            })
    }

    fn byte(&self, pos: usize) -> Result<u8, UnpackError> {
        self.take(pos, 1).map(|b| b[0])
    }

    fn word(&self, pos: usize, width: usize) -> Result<u64, UnpackError> {
        let mut raw = [0u8; 8];
        raw[..width].copy_from_slice(self.take(pos, width)?);
        Ok(u64::from_le_bytes(raw))
    }
}

/// Sign-extends the low `width` bytes of `raw`.
fn sign_extend(raw: u64, width: usize) -> i64 {
    let shift = 64 - 8 * width as u32;
    ((raw << shift) as i64) >> shift
}

pub(crate) fn unpack(layout: &Layout, buffer: &[u8]) -> Result<Vec<Value>, UnpackError> {
    if !layout.is_dynamic() && buffer.len() != layout.size() {
        return Err(UnpackError::SizeMismatch {
            expected: layout.size(),
            actual: buffer.len(),
        });
    }

    let (values, consumed) = unpack_prefix(layout, buffer)?;
    if consumed != buffer.len() {
        return Err(UnpackError::SizeMismatch {
            expected: consumed,
            actual: buffer.len(),
        });
    }
    Ok(values)
}

pub(crate) fn unpack_prefix(
    layout: &Layout,
    buffer: &[u8],
) -> Result<(Vec<Value>, usize), UnpackError> {
    let reader = Reader { buf: buffer };
    // a static offset near the size limit plus dynamic content cannot fit any buffer
    let beyond = || UnpackError::Truncated {
        needed: usize::MAX,
        available: buffer.len(),
    };
    let mut values = Vec::with_capacity(layout.len());
    let mut shift = 0usize;

    for code in layout.fields() {
        let pos = code.offset.checked_add(shift).ok_or_else(beyond)?;
        let width = code.descriptor.width;

        let value = match code.kind() {
            FieldKind::SignedInt => Value::Int(sign_extend(reader.word(pos, width)?, width)),
            FieldKind::UnsignedInt => Value::UInt(reader.word(pos, width)?),
            FieldKind::Float32 => {
                let raw = reader.word(pos, 4)? as u32;
                Value::Float(f64::from(f32::from_bits(raw)))
            }
            FieldKind::Float64 => Value::Float(f64::from_bits(reader.word(pos, 8)?)),
            FieldKind::Bool => Value::Bool(reader.byte(pos)? != 0),
            FieldKind::Char => Value::Bytes(vec![reader.byte(pos)?]),
            FieldKind::FixedBytes => Value::Bytes(reader.take(pos, code.count)?.to_vec()),
            FieldKind::PascalString => {
                if code.count == 0 {
                    Value::Bytes(Vec::new())
                } else {
                    let n = usize::from(reader.byte(pos)?).min(code.count - 1);
                    Value::Bytes(reader.take(pos + 1, n)?.to_vec())
                }
            }
            FieldKind::DynamicString => {
                let n = usize::from(reader.byte(pos)?);
                let bytes = reader.take(pos + 1, n)?.to_vec();
                shift += n + 1;
                Value::Bytes(bytes)
            }
            FieldKind::Pad => continue,
        };
        values.push(value);
    }

    let consumed = layout.size().checked_add(shift).ok_or_else(beyond)?;
    if buffer.len() < consumed {
        // trailing pad bytes are never read, but they belong to the record
        return Err(UnpackError::Truncated {
            needed: consumed,
            available: buffer.len(),
        });
    }
    Ok((values, consumed))
}

/// Iterator over back-to-back records, created by
/// [`Layout::iter_unpack`](crate::Layout::iter_unpack).
///
/// Yields an error once and then stops if a record is truncated.
pub struct RecordIter<'a> {
    layout: &'a Layout,
    rest: &'a [u8],
    failed: bool,
}

impl<'a> RecordIter<'a> {
    pub(crate) fn new(layout: &'a Layout, buffer: &'a [u8]) -> Self {
        RecordIter {
            layout,
            rest: buffer,
            failed: false,
        }
    }
}

impl<'a> Iterator for RecordIter<'a> {
    type Item = Result<Vec<Value>, UnpackError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.rest.is_empty() {
            return None;
        }
        match unpack_prefix(self.layout, self.rest) {
            // a layout that occupies no bytes would never advance
            Ok((_, 0)) => {
                self.failed = true;
                None
            }
            Ok((values, consumed)) => {
                self.rest = &self.rest[consumed..];
                Some(Ok(values))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}
