//! Named records packed from maps and structs.
//!
//! Run with: cargo run --example records

use finstruct::{FieldType, Record, RecordMap};
use serde::{Deserialize, Serialize};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Trade {
    symbol: String,
    price: f64,
    quantity: u32,
    buy: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let trade_record = Record::builder("Trade")
        .field("symbol", FieldType::Pascal(8))
        .field("price", FieldType::Float64)
        .field("quantity", FieldType::UInt32)
        .field("buy", FieldType::Bool)
        .pad(2)
        .build()?;
    println!(
        "{} -> format {:?}, {} bytes",
        trade_record.name(),
        trade_record.format(),
        trade_record.size()
    );

    let trade = Trade {
        symbol: "ACME".to_string(),
        price: 101.25,
        quantity: 500,
        buy: true,
    };
    let bytes = trade_record.pack_struct(&trade)?;
    println!("packed: {:02x?}", bytes);

    let back: Trade = trade_record.unpack_struct(&bytes)?;
    assert_eq!(trade, back);

    let map: RecordMap = trade_record.unpack_map(&bytes)?;
    println!("\nAs a map:");
    for (name, value) in &map {
        println!("  {:<8} = {}", name, value);
    }

    let mut order = RecordMap::new();
    order.insert("symbol", "INIT");
    order.insert("price", 9.5);
    order.insert("quantity", 10u32);
    order.insert("buy", false);
    let packed = trade_record.pack_map(&order)?;
    println!("\npacked from map: {} bytes", packed.len());

    Ok(())
}
