//! Integer overflow and long-string policies.
//!
//! Run with: cargo run --example strict_mode

use finstruct::{pack_with_options, values, LongStrings, Overflow, PackOptions, Value};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let wrap = PackOptions::new();
    let strict = PackOptions::new().with_overflow(Overflow::Strict);

    println!("Packing 300 into 'B':");
    println!(
        "  {:<6} -> {:?}",
        wrap.overflow.as_str(),
        pack_with_options("B", &values![300], wrap)
    );
    match pack_with_options("B", &values![300], strict) {
        Ok(bytes) => println!("  strict -> {:?}", bytes),
        Err(e) => println!("  {:<6} -> error: {}", strict.overflow.as_str(), e),
    }

    let long = Value::Bytes(vec![b'x'; 300]);
    println!("\nPacking a 300-byte dynamic string:");
    if let Err(e) = pack_with_options("S", &[long.clone()], wrap) {
        println!("  {:<8} -> error: {}", wrap.long_strings.as_str(), e);
    }
    let truncate = wrap.with_long_strings(LongStrings::Truncate);
    let bytes = pack_with_options("S", &[long], truncate)?;
    println!(
        "  {:<8} -> {} bytes, length byte {}",
        truncate.long_strings.as_str(),
        bytes.len(),
        bytes[0]
    );

    Ok(())
}
