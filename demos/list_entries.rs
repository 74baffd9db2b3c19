//! List the entries of a corpus, optionally filtered by a query
//!
//! Usage: cargo run --example list_entries -- <corpus> [query]

use alpinocorpus::Reader;
use std::process::ExitCode;

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: list_entries <corpus> [query]");
        return ExitCode::FAILURE;
    };

    match run(&path, args.next()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str, query: Option<String>) -> alpinocorpus::Result<()> {
    let mut reader = Reader::open(path)?;
    println!("=== {} ({}) ===\n", path, reader.backend().unwrap_or("closed"));

    let names = match &query {
        Some(text) => {
            if !reader.valid_query(text)? {
                eprintln!("Warning: engine reports query as invalid: {}", text);
            }
            reader.query(text.as_str()).entries()?.collect::<Vec<_>>()
        }
        None => reader.entries()?.collect(),
    };

    for name in &names {
        let content = reader.read(name)?;
        println!("  {} ({} bytes)", name, content.len());
    }
    println!("\n{} entries", names.len());

    reader.close();
    Ok(())
}
