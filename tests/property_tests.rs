//! Property-based tests for the pack/unpack round trip and packed sizes.
//!
//! Formats are generated from a small field alphabet together with values
//! that are in range for each field, so the round trip must be exact.

use finstruct::{calcsize, pack, unpack, Layout, Value};
use proptest::prelude::*;

/// A generated field: its format fragment and a value that fits it.
fn field() -> impl Strategy<Value = (String, Value)> {
    prop_oneof![
        any::<i8>().prop_map(|n| ("b".to_string(), Value::from(n))),
        any::<u8>().prop_map(|n| ("B".to_string(), Value::from(n))),
        any::<i16>().prop_map(|n| ("h".to_string(), Value::from(n))),
        any::<u16>().prop_map(|n| ("H".to_string(), Value::from(n))),
        any::<i32>().prop_map(|n| ("i".to_string(), Value::from(n))),
        any::<u32>().prop_map(|n| ("L".to_string(), Value::from(n))),
        any::<i64>().prop_map(|n| ("q".to_string(), Value::from(n))),
        any::<u64>().prop_map(|n| ("Q".to_string(), Value::from(n))),
        any::<bool>().prop_map(|b| ("?".to_string(), Value::from(b))),
        any::<u8>().prop_map(|b| ("c".to_string(), Value::Bytes(vec![b]))),
        any::<f32>()
            .prop_filter("NaN never compares equal", |x| !x.is_nan())
            .prop_map(|x| ("f".to_string(), Value::from(x))),
        any::<f64>()
            .prop_filter("NaN never compares equal", |x| !x.is_nan())
            .prop_map(|x| ("d".to_string(), Value::from(x))),
        prop::collection::vec(any::<u8>(), 0..12).prop_map(|b| {
            (format!("{}s", b.len()), Value::Bytes(b))
        }),
        prop::collection::vec(any::<u8>(), 0..12).prop_map(|b| {
            (format!("{}p", b.len() + 1), Value::Bytes(b))
        }),
    ]
}

fn dynamic_field() -> impl Strategy<Value = (String, Value)> {
    prop_oneof![
        3 => field(),
        1 => prop::collection::vec(any::<u8>(), 0..=255)
            .prop_map(|b| ("S".to_string(), Value::Bytes(b))),
    ]
}

fn split(fields: Vec<(String, Value)>) -> (String, Vec<Value>) {
    let mut format = String::new();
    let mut values = Vec::with_capacity(fields.len());
    for (fragment, value) in fields {
        format.push_str(&fragment);
        values.push(value);
    }
    (format, values)
}

proptest! {
    #[test]
    fn prop_static_roundtrip(fields in prop::collection::vec(field(), 0..16)) {
        let (format, values) = split(fields);
        let bytes = pack(&format, &values).unwrap();
        prop_assert_eq!(bytes.len(), calcsize(&format).unwrap());
        prop_assert_eq!(unpack(&format, &bytes).unwrap(), values);
    }

    #[test]
    fn prop_dynamic_roundtrip(fields in prop::collection::vec(dynamic_field(), 0..12)) {
        let extra: usize = fields
            .iter()
            .filter(|(fragment, _)| fragment == "S")
            .map(|(_, value)| value.as_bytes().map_or(0, <[u8]>::len) + 1)
            .sum();
        let (format, values) = split(fields);

        let layout = Layout::compile(&format).unwrap();
        let bytes = layout.pack(&values).unwrap();
        prop_assert_eq!(bytes.len(), layout.size() + extra);
        prop_assert_eq!(layout.packed_size(&values).unwrap(), bytes.len());
        prop_assert_eq!(layout.unpack(&bytes).unwrap(), values);
    }

    #[test]
    fn prop_wrap_is_modular(x in any::<i64>()) {
        let bytes = pack("H", &[Value::from(x)]).unwrap();
        let expected = (x as i128).rem_euclid(1 << 16) as u64;
        prop_assert_eq!(unpack("H", &bytes).unwrap(), vec![Value::UInt(expected)]);
    }

    #[test]
    fn prop_signed_wrap_sign_extends(
        (tag, width) in prop::sample::select(vec![("b", 1u32), ("h", 2), ("i", 4)]),
        x in any::<i64>(),
    ) {
        let bytes = pack(tag, &[Value::from(x)]).unwrap();
        prop_assert_eq!(bytes.len(), width as usize);

        let modulus = 1i128 << (8 * width);
        let low = (x as i128).rem_euclid(modulus);
        let expected = if low >= modulus / 2 { low - modulus } else { low };
        prop_assert_eq!(unpack(tag, &bytes).unwrap(), vec![Value::Int(expected as i64)]);
    }

    #[test]
    fn prop_unpack_never_panics(
        format in prop::sample::select(vec!["BSH", "SS", "5pS", "iS?", "S3x"]),
        buffer in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let _ = unpack(format, &buffer);
    }
}
