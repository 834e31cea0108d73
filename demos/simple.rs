//! Packing and unpacking positional values.
//!
//! Run with: cargo run --example simple

use finstruct::{calcsize, pack, unpack, Value};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let format = "<HHI";
    println!("{} occupies {} bytes", format, calcsize(format)?);

    let values = vec![Value::from(7u16), Value::from(42u16), Value::from(65_536u32)];
    let bytes = pack(format, &values)?;
    println!("packed:   {:02x?}", bytes);

    let back = unpack(format, &bytes)?;
    let shown: Vec<String> = back.iter().map(Value::to_string).collect();
    println!("unpacked: ({})", shown.join(", "));
    assert_eq!(values, back);

    // A pad byte takes no value
    let padded = pack("xB", &[Value::from(5u8)])?;
    println!("xB:       {:02x?}", padded);

    println!("✓ Round-trip successful");
    Ok(())
}
