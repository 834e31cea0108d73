use finstruct::{
    calcsize, compile, pack, pack_with_options, unpack, values, Error, FormatError, LongStrings,
    PackError, PackOptions, UnpackError, Value,
};

#[test]
fn test_little_endian_byte_order() {
    assert_eq!(pack("I", &values![1u32]).unwrap(), [0x01, 0x00, 0x00, 0x00]);
    assert_eq!(pack("h", &values![-2]).unwrap(), [0xfe, 0xff]);
    assert_eq!(
        pack("Q", &values![0x0102_0304_0506_0708u64]).unwrap(),
        [8, 7, 6, 5, 4, 3, 2, 1]
    );
    assert_eq!(pack("<H", &values![0x1234u16]).unwrap(), [0x34, 0x12]);
}

#[test]
fn test_signed_wrap() {
    let bytes = pack("b", &values![200]).unwrap();
    assert_eq!(bytes, [0xc8]);
    assert_eq!(unpack("b", &bytes).unwrap(), vec![Value::Int(-56)]);
}

#[test]
fn test_unsigned_wrap() {
    assert_eq!(pack("B", &values![300]).unwrap(), [44]);
    assert_eq!(pack("H", &values![-1]).unwrap(), [0xff, 0xff]);
    assert_eq!(pack("I", &values![1u64 << 32]).unwrap(), [0, 0, 0, 0]);
}

#[test]
fn test_pad_consumes_no_value() {
    let bytes = pack("xB", &values![5u8]).unwrap();
    assert_eq!(bytes, [0x00, 0x05]);
    assert_eq!(unpack("xB", &bytes).unwrap(), vec![Value::UInt(5)]);
}

#[test]
fn test_dynamic_string_then_int() {
    let bytes = pack("SI", &values!["hi", 7u32]).unwrap();
    assert_eq!(bytes, [0x02, 0x68, 0x69, 0x07, 0x00, 0x00, 0x00]);
    assert_eq!(unpack("SI", &bytes).unwrap(), values!["hi", 7u32]);
}

#[test]
fn test_pascal_truncation() {
    let bytes = pack("5p", &values!["abcdef"]).unwrap();
    assert_eq!(bytes, [4, b'a', b'b', b'c', b'd']);
    assert_eq!(unpack("5p", &bytes).unwrap(), values!["abcd"]);
}

#[test]
fn test_fixed_bytes_zero_fill_and_truncate() {
    assert_eq!(pack("4s", &values!["ab"]).unwrap(), [b'a', b'b', 0, 0]);
    assert_eq!(pack("2s", &values!["abc"]).unwrap(), [b'a', b'b']);
    // zero padding is returned as-is on unpack
    assert_eq!(unpack("4s", &[b'a', b'b', 0, 0]).unwrap(), values![b"ab\0\0"]);
}

#[test]
fn test_floats() {
    let bytes = pack("fd", &values![1.5, -0.25]).unwrap();
    assert_eq!(&bytes[..4], &1.5f32.to_le_bytes());
    assert_eq!(&bytes[4..], &(-0.25f64).to_le_bytes());
    assert_eq!(unpack("fd", &bytes).unwrap(), values![1.5, -0.25]);

    // integers are accepted by float fields
    assert_eq!(pack("d", &values![2]).unwrap(), 2.0f64.to_le_bytes());
}

#[test]
fn test_bool_and_char() {
    let bytes = pack("??c", &values![true, 0, b"z"]).unwrap();
    assert_eq!(bytes, [1, 0, b'z']);
    assert_eq!(unpack("??c", &bytes).unwrap(), values![true, false, b"z"]);
    assert_eq!(unpack("?", &[7]).unwrap(), values![true]);
}

#[test]
fn test_calcsize_excludes_dynamic_content() {
    assert_eq!(calcsize("18s15sS").unwrap(), 33);
    assert_eq!(calcsize("bhiq").unwrap(), 15);
    assert_eq!(calcsize("lL").unwrap(), 8);
    assert_eq!(calcsize(" 2 H\t4x ").unwrap(), 8);
}

#[test]
fn test_packed_length_properties() {
    let values = values!["fin", "10.0.0.1", "hello there"];
    let bytes = pack("18s15sS", &values).unwrap();
    assert_eq!(bytes.len(), 33 + "hello there".len() + 1);

    let layout = compile("18s15sS").unwrap();
    assert_eq!(layout.packed_size(&values).unwrap(), bytes.len());
}

#[test]
fn test_multiple_dynamic_fields() {
    let bytes = pack("SBS", &values!["a", 9u8, ""]).unwrap();
    assert_eq!(bytes, [1, b'a', 9, 0]);
    assert_eq!(unpack("SBS", &bytes).unwrap(), values!["a", 9u8, ""]);
}

#[test]
fn test_repeat_counts() {
    let bytes = pack("3B2S", &values![1u8, 2u8, 3u8, "x", "yz"]).unwrap();
    assert_eq!(bytes, [1, 2, 3, 1, b'x', 2, b'y', b'z']);
}

#[test]
fn test_format_errors() {
    assert_eq!(
        calcsize("iz"),
        Err(Error::Format(FormatError::UnknownTag {
            tag: 'z',
            position: 1
        }))
    );
    assert_eq!(
        calcsize(">i"),
        Err(Error::Format(FormatError::UnknownTag {
            tag: '>',
            position: 0
        }))
    );
    assert_eq!(
        calcsize("B12"),
        Err(Error::Format(FormatError::DanglingCount { position: 1 }))
    );
    assert!(matches!(
        calcsize("99999999999999999999999B"),
        Err(Error::Format(FormatError::CountOverflow { position: 0 }))
    ));
}

#[test]
fn test_pack_errors() {
    assert_eq!(
        pack("BB", &values![1u8]),
        Err(Error::Pack(PackError::ArityMismatch {
            expected: 2,
            found: 1
        }))
    );
    assert!(matches!(
        pack("i", &values!["nope"]),
        Err(Error::Pack(PackError::TypeMismatch { tag: 'i', .. }))
    ));
    assert!(matches!(
        pack("c", &values!["ab"]),
        Err(Error::Pack(PackError::TypeMismatch { tag: 'c', .. }))
    ));
    assert!(matches!(
        pack("s", &values![1]),
        Err(Error::Pack(PackError::TypeMismatch { tag: 's', .. }))
    ));
}

#[test]
fn test_strict_overflow() {
    let strict = PackOptions::strict();
    assert_eq!(
        pack_with_options("b", &values![200], strict),
        Err(Error::Pack(PackError::OutOfRange {
            tag: 'b',
            value: 200,
            min: -128,
            max: 127
        }))
    );
    assert!(pack_with_options("B", &values![-1], strict).is_err());
    assert_eq!(
        pack_with_options("Q", &values![u64::MAX], strict).unwrap(),
        [0xff; 8]
    );
}

#[test]
fn test_long_dynamic_string() {
    let long = vec![b'a'; 300];
    assert_eq!(
        pack("S", &[Value::Bytes(long.clone())]),
        Err(Error::Pack(PackError::StringTooLong {
            tag: 'S',
            len: 300,
            max: 255
        }))
    );

    let options = PackOptions::new().with_long_strings(LongStrings::Truncate);
    let bytes = pack_with_options("S", &[Value::Bytes(long)], options).unwrap();
    assert_eq!(bytes.len(), 256);
    assert_eq!(bytes[0], 255);
}

#[test]
fn test_unpack_errors() {
    assert_eq!(
        unpack("I", &[1, 0, 0]),
        Err(Error::Unpack(UnpackError::SizeMismatch {
            expected: 4,
            actual: 3
        }))
    );
    assert!(matches!(
        unpack("SI", &[5, b'a']),
        Err(Error::Unpack(UnpackError::Truncated { .. }))
    ));
    assert_eq!(
        unpack("S", &[1, b'a', 0xff]),
        Err(Error::Unpack(UnpackError::SizeMismatch {
            expected: 2,
            actual: 3
        }))
    );
}

#[test]
fn test_streaming_records() {
    let layout = compile("HS").unwrap();
    let mut out = Vec::new();
    for (id, name) in [(1u16, "a"), (2, "bc"), (3, "")] {
        layout
            .pack_into(&mut out, &values![id, name], &PackOptions::new())
            .unwrap();
    }

    let (first, used) = layout.unpack_prefix(&out).unwrap();
    assert_eq!(first, values![1u16, "a"]);
    assert_eq!(used, 4);

    let records: Vec<_> = layout
        .iter_unpack(&out)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        records,
        vec![values![1u16, "a"], values![2u16, "bc"], values![3u16, ""]]
    );
}

#[test]
fn test_pack_into_failure_leaves_buffer() {
    let layout = compile("BS").unwrap();
    let mut out = vec![0xaa];
    let err = layout.pack_into(&mut out, &values![1u8, 2u8], &PackOptions::new());
    assert!(err.is_err());
    assert_eq!(out, [0xaa]);
}

#[test]
fn test_empty_format() {
    assert_eq!(calcsize("").unwrap(), 0);
    assert_eq!(pack("", &[]).unwrap(), Vec::<u8>::new());
    assert_eq!(unpack("", &[]).unwrap(), Vec::<Value>::new());
}
