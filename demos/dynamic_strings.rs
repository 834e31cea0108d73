//! Records with dynamic `S` strings, streamed back to back.
//!
//! Run with: cargo run --example dynamic_strings

use finstruct::{compile, values, PackOptions};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // fixed-size name and address, then a message sized per record
    let layout = compile("18s15sS")?;
    println!(
        "{}: static size {}, dynamic: {}",
        layout.format(),
        layout.size(),
        layout.is_dynamic()
    );

    let messages = [
        ("alice", "10.0.0.1", "hi"),
        ("bob", "10.0.0.2", "hello, alice"),
        ("carol", "10.0.0.3", ""),
    ];

    let mut stream = Vec::new();
    for (name, ip, text) in messages {
        let values = values![name, ip, text];
        let written = layout.pack_into(&mut stream, &values, &PackOptions::new())?;
        println!("{:<6} -> {} bytes", name, written);
    }
    println!("stream holds {} bytes\n", stream.len());

    for record in layout.iter_unpack(&stream) {
        let record = record?;
        let name = String::from_utf8_lossy(record[0].as_bytes().unwrap_or_default());
        println!(
            "{}: {}",
            name.trim_end_matches('\0'),
            record[2].as_str().unwrap_or("<binary>")
        );
    }

    Ok(())
}
