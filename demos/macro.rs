//! Building value lists with the values! macro.
//!
//! Run with: cargo run --example macro

use finstruct::{pack, to_values, unpack, values};
use serde::Serialize;
use std::error::Error;

#[derive(Serialize)]
struct Sensor {
    id: u16,
    celsius: f32,
    online: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let reading = values![3u16, 21.5, true, "north"];
    println!("Values:");
    for value in &reading {
        println!("  {:<6} {}", value.kind_name(), value);
    }

    let bytes = pack("Hf?S", &reading)?;
    println!("\nPacked {} bytes: {:02x?}", bytes.len(), bytes);
    assert_eq!(unpack("Hf?S", &bytes)?, reading);

    // The same list, produced from a struct
    let sensor = Sensor {
        id: 3,
        celsius: 21.5,
        online: true,
    };
    let mut from_struct = to_values(&sensor)?;
    from_struct.push("north".into());
    assert_eq!(pack("Hf?S", &from_struct)?, bytes);
    println!("✓ Struct and macro agree");

    Ok(())
}
