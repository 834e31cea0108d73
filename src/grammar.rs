//! Format string grammar and wire format
//!
//! This module documents the format strings accepted by
//! [`Layout::compile`](crate::Layout::compile) and the bytes produced by the
//! pack engine.
//!
//! # Overview
//!
//! A format string is a sequence of field tags, each optionally preceded by a
//! decimal count. It describes one fixed-shape binary record, optionally
//! followed by variable-length strings. All multi-byte values are
//! little-endian and fields are packed with no alignment padding.
//!
//! ```text
//! format  := ws* ['<'] (ws* [count] ws* tag)* ws*
//! count   := digit+
//! tag     := 'x' | 'c' | 'b' | 'B' | '?' | 'h' | 'H' | 'i' | 'I' | 'l' | 'L'
//!          | 'q' | 'Q' | 'f' | 'd' | 's' | 'p' | 'S'
//! ```
//!
//! Whitespace may appear anywhere, including between the digits of a count,
//! and is ignored.
//!
//! # Field Tags
//!
//! | Tag | Width | Value | Wire |
//! |-----|-------|-------|------|
//! | `x` | 1 | none | zero byte |
//! | `c` | 1 | bytes of length 1 | the byte |
//! | `b` / `B` | 1 | integer | signed / unsigned |
//! | `?` | 1 | any, by truthiness | `0` or `1` |
//! | `h` / `H` | 2 | integer | signed / unsigned |
//! | `i` / `I` | 4 | integer | signed / unsigned |
//! | `l` / `L` | 4 | integer | same as `i` / `I` |
//! | `q` / `Q` | 8 | integer | signed / unsigned |
//! | `f` | 4 | number | IEEE 754 binary32 |
//! | `d` | 8 | number | IEEE 754 binary64 |
//! | `s` | count | bytes | raw bytes, zero-filled |
//! | `p` | count | bytes | length byte then bytes, zero-filled |
//! | `S` | 0 static | bytes | length byte then bytes, appended |
//!
//! # Counts
//!
//! - For `s` and `p` the count is the byte capacity and the field takes one
//!   value. `0s` and `0p` take one value and occupy no bytes.
//! - For `x` the count is the number of zero bytes.
//! - For every other tag, including `S`, the count repeats the field:
//!   `3H` is the same as `HHH`.
//! - A count with no tag after it is an error.
//!
//! # Integers
//!
//! By default an integer is reduced modulo 2^(8 * width) and written in two's
//! complement, so `B` with `300` stores `44` and `b` with `200` stores `-56`.
//! With [`Overflow::Strict`](crate::Overflow::Strict) a value outside the
//! field's range is an error instead.
//!
//! # Strings
//!
//! `s` copies up to `count` bytes and zero-fills the rest; longer input is
//! truncated. `p` stores `min(len, count - 1, 255)` in its first byte, then
//! that many bytes, then zeros. On unpack the stored length is clamped to
//! `count - 1`.
//!
//! # Dynamic Strings
//!
//! `S` contributes nothing to the static region. Its content is spliced into
//! the record at the field's position as a length byte followed by the bytes,
//! and every later field moves right by that amount:
//!
//! ```text
//! format: B S H
//! values: 1, "hey", 2
//! bytes:  01 | 03 68 65 79 | 02 00
//! ```
//!
//! A dynamic string can hold at most 255 bytes. Longer input is rejected
//! unless [`LongStrings::Truncate`](crate::LongStrings::Truncate) is selected.
//!
//! # Byte Order
//!
//! Only little-endian is supported. A leading `<` is accepted for clarity;
//! any other byte-order prefix (`>`, `!`, `=`, `@`) is an unknown tag.
