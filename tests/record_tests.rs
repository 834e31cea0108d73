use finstruct::{
    from_values, pack_struct, to_values, unpack_struct, values, Error, FieldType, Record,
    RecordMap, Value,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ChatMessage {
    name: String,
    ip: String,
    message: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Header {
    kind: u8,
    seq: u32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Quote {
    header: Header,
    symbol: String,
    bid: f64,
    ask: f64,
    live: bool,
}

fn chat_record() -> Record {
    Record::builder("ChatMessage")
        .field("name", FieldType::Dynamic)
        .field("ip", FieldType::Bytes(15))
        .field("message", FieldType::Dynamic)
        .build()
        .unwrap()
}

#[test]
fn test_record_struct_roundtrip() {
    let record = chat_record();
    let msg = ChatMessage {
        name: "fin".to_string(),
        ip: "127.0.0.1".to_string(),
        message: "hello".to_string(),
    };

    let bytes = record.pack_struct(&msg).unwrap();
    assert_eq!(bytes.len(), 15 + 4 + 6);
    assert_eq!(&bytes[..4], &[3, b'f', b'i', b'n']);

    // the fixed `s` field comes back zero padded
    let values = record.unpack(&bytes).unwrap();
    assert_eq!(values[1].as_bytes().map(<[u8]>::len), Some(15));

    let map = record.unpack_map(&bytes).unwrap();
    assert_eq!(map.get("message").and_then(Value::as_str), Some("hello"));
}

#[test]
fn test_record_map_from_hashmap() {
    let record = Record::builder("Point")
        .field("x", FieldType::Int16)
        .field("y", FieldType::Int16)
        .build()
        .unwrap();

    let mut raw = HashMap::new();
    raw.insert("y".to_string(), Value::from(-1));
    raw.insert("x".to_string(), Value::from(2));
    raw.insert("ignored".to_string(), Value::from(true));

    let bytes = record.pack_map(&RecordMap::from(raw)).unwrap();
    assert_eq!(bytes, [2, 0, 0xff, 0xff]);
}

#[test]
fn test_record_unpack_struct() {
    let record = Record::builder("Header")
        .field("kind", FieldType::UInt8)
        .pad(1)
        .field("seq", FieldType::UInt32)
        .build()
        .unwrap();
    assert_eq!(record.format(), "B1xI");

    let header: Header = record.unpack_struct(&[4, 0, 9, 0, 0, 0]).unwrap();
    assert_eq!(header, Header { kind: 4, seq: 9 });
}

#[test]
fn test_nested_struct_roundtrip() {
    let quote = Quote {
        header: Header { kind: 2, seq: 77 },
        symbol: "ACME".to_string(),
        bid: 10.25,
        ask: 10.5,
        live: true,
    };

    let bytes = pack_struct("BISdd?", &quote).unwrap();
    assert_eq!(bytes.len(), 1 + 4 + 5 + 16 + 1);

    let back: Quote = unpack_struct("BISdd?", &bytes).unwrap();
    assert_eq!(back, quote);
}

#[test]
fn test_struct_arity_mismatch() {
    let header = Header { kind: 1, seq: 2 };
    assert!(matches!(pack_struct("B", &header), Err(Error::Pack(_))));
    assert_eq!(
        unpack_struct::<(u8,)>("BB", &[1, 2]),
        Err(Error::TrailingValues(1))
    );
}

#[test]
fn test_bridge_values() {
    let values = to_values(&("ok", 3i8, [1u8, 2u8])).unwrap();
    assert_eq!(values, values!["ok", 3i8, 1u8, 2u8]);

    let back: (String, i8, [u8; 2]) = from_values(values).unwrap();
    assert_eq!(back, ("ok".to_string(), 3, [1, 2]));
}

#[test]
fn test_unsupported_shapes() {
    #[derive(Serialize)]
    enum Side {
        Buy,
    }
    assert!(matches!(
        to_values(&Side::Buy),
        Err(Error::UnsupportedType(_))
    ));

    let map: HashMap<String, u8> = HashMap::new();
    assert!(matches!(to_values(&map), Err(Error::UnsupportedType(_))));
}
