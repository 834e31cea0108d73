//! The pack engine.
//!
//! Packing is two-pass for dynamic layouts: the first pass sizes every `S`
//! field from its value, the second writes fields in declaration order into
//! a zero-initialized buffer. Each field is written at its static offset
//! shifted by the dynamic bytes written before it.

use crate::descriptor::FieldKind;
use crate::layout::{FieldCode, Layout};
use crate::{LongStrings, Overflow, PackError, PackOptions, Value};

/// Largest payload a one-byte length prefix can describe.
pub const MAX_PREFIXED_LEN: usize = u8::MAX as usize;

fn check_arity(layout: &Layout, values: &[Value]) -> Result<(), PackError> {
    if values.len() != layout.len() {
        return Err(PackError::ArityMismatch {
            expected: layout.len(),
            found: values.len(),
        });
    }
    Ok(())
}

fn type_mismatch(code: &FieldCode, value: &Value) -> PackError {
    PackError::TypeMismatch {
        tag: code.tag(),
        expected: code.kind().expects(),
        found: value.kind_name(),
    }
}

fn bytes_of<'v>(code: &FieldCode, value: &'v Value) -> Result<&'v [u8], PackError> {
    value.as_bytes().ok_or_else(|| type_mismatch(code, value))
}

/// Payload length stored for a dynamic string under the long-string policy.
fn dynamic_len(code: &FieldCode, bytes: &[u8], options: &PackOptions) -> Result<usize, PackError> {
    if bytes.len() <= MAX_PREFIXED_LEN {
        return Ok(bytes.len());
    }
    match options.long_strings {
        LongStrings::Truncate => Ok(MAX_PREFIXED_LEN),
        LongStrings::Reject => Err(PackError::StringTooLong {
            tag: code.tag(),
            len: bytes.len(),
            max: MAX_PREFIXED_LEN,
        }),
    }
}

/// Pairs each value-carrying field with its value; pad fields get `None`.
fn walk<'a>(
    layout: &'a Layout,
    values: &'a [Value],
) -> impl Iterator<Item = (&'a FieldCode, Option<&'a Value>)> + 'a {
    let mut values = values.iter();
    layout.fields().iter().map(move |code| {
        let value = if code.kind().has_value() {
            values.next()
        } else {
            None
        };
        (code, value)
    })
}

pub(crate) fn packed_size(
    layout: &Layout,
    values: &[Value],
    options: &PackOptions,
) -> Result<usize, PackError> {
    check_arity(layout, values)?;
    if !layout.is_dynamic() {
        return Ok(layout.size());
    }

    let mut total = layout.size();
    for (code, value) in walk(layout, values) {
        if let (FieldKind::DynamicString, Some(value)) = (code.kind(), value) {
            let n = dynamic_len(code, bytes_of(code, value)?, options)?;
            total = total
                .checked_add(n + 1)
                .ok_or(PackError::SizeOverflow)?;
        }
    }
    Ok(total)
}

pub(crate) fn pack_into(
    layout: &Layout,
    values: &[Value],
    options: &PackOptions,
    out: &mut Vec<u8>,
) -> Result<usize, PackError> {
    let total = packed_size(layout, values, options)?;
    let start = out.len();
    let end = start.checked_add(total).ok_or(PackError::SizeOverflow)?;
    out.resize(end, 0);

    if let Err(err) = write_fields(layout, values, options, &mut out[start..]) {
        out.truncate(start);
        return Err(err);
    }
    Ok(total)
}

fn write_fields(
    layout: &Layout,
    values: &[Value],
    options: &PackOptions,
    buf: &mut [u8],
) -> Result<(), PackError> {
    let mut shift = 0usize;

    for (code, value) in walk(layout, values) {
        let pos = code.offset + shift;
        let value = match value {
            Some(value) => value,
            // pad bytes stay zero
            None => continue,
        };

        match code.kind() {
            FieldKind::SignedInt | FieldKind::UnsignedInt => {
                let width = code.descriptor.width;
                let raw = integer_bytes(code, value, options.overflow)?;
                buf[pos..pos + width].copy_from_slice(&raw[..width]);
            }
            FieldKind::Float32 => {
                let x = value.as_f64().ok_or_else(|| type_mismatch(code, value))?;
                buf[pos..pos + 4].copy_from_slice(&(x as f32).to_le_bytes());
            }
            FieldKind::Float64 => {
                let x = value.as_f64().ok_or_else(|| type_mismatch(code, value))?;
                buf[pos..pos + 8].copy_from_slice(&x.to_le_bytes());
            }
            FieldKind::Bool => {
                buf[pos] = u8::from(value.is_truthy());
            }
            FieldKind::Char => match value.as_bytes() {
                Some([b]) => buf[pos] = *b,
                _ => return Err(type_mismatch(code, value)),
            },
            FieldKind::FixedBytes => {
                let bytes = bytes_of(code, value)?;
                let n = bytes.len().min(code.count);
                buf[pos..pos + n].copy_from_slice(&bytes[..n]);
            }
            FieldKind::PascalString => {
                let bytes = bytes_of(code, value)?;
                if code.count > 0 {
                    let n = bytes.len().min(code.count - 1).min(MAX_PREFIXED_LEN);
                    buf[pos] = n as u8;
                    buf[pos + 1..pos + 1 + n].copy_from_slice(&bytes[..n]);
                }
            }
            FieldKind::DynamicString => {
                let bytes = bytes_of(code, value)?;
                let n = dynamic_len(code, bytes, options)?;
                buf[pos] = n as u8;
                buf[pos + 1..pos + 1 + n].copy_from_slice(&bytes[..n]);
                shift += n + 1;
            }
            FieldKind::Pad => {}
        }
    }
    Ok(())
}

/// Inclusive range of an integer field, widened to `i128`.
pub(crate) fn integer_range(kind: FieldKind, width: usize) -> (i128, i128) {
    let bits = 8 * width as u32;
    match kind {
        FieldKind::SignedInt => (-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1),
        _ => (0, (1i128 << bits) - 1),
    }
}

/// Little-endian two's complement bytes of `value`; the caller keeps the
/// first `width` bytes, which reduces the value modulo `2^(8 * width)`.
fn integer_bytes(
    code: &FieldCode,
    value: &Value,
    overflow: Overflow,
) -> Result<[u8; 16], PackError> {
    let x = value.as_i128().ok_or_else(|| type_mismatch(code, value))?;
    if overflow == Overflow::Strict {
        let (min, max) = integer_range(code.kind(), code.descriptor.width);
        if x < min || x > max {
            return Err(PackError::OutOfRange {
                tag: code.tag(),
                value: x,
                min,
                max,
            });
        }
    }
    Ok((x as u128).to_le_bytes())
}
