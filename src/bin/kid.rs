//! A utility to generate or inspect Kids.
//!
//! With no arguments, prints one freshly generated ID. `-c N` prints N of
//! them. Any positional arguments are decoded and their components printed,
//! one per line; generate and inspect 4 random IDs with command substitution:
//!
//! ```text
//! kid `kid -c 4`
//! ```

use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::Parser;
use kid::Kid;

/// Generate or inspect K-sortable IDs.
#[derive(Parser, Debug)]
#[command(name = "kid", version, about = "Generate or inspect K-sortable IDs")]
struct Cli {
    /// Generate N-count IDs.
    #[arg(short = 'c', long = "count", default_value_t = 1, value_name = "N")]
    count: u32,

    /// Base32 IDs to decode and inspect.
    #[arg(value_name = "ID")]
    ids: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.count > 1 && !cli.ids.is_empty() {
        eprintln!("kid: cannot generate IDs and inspect at the same time");
        return ExitCode::FAILURE;
    }

    if !cli.ids.is_empty() {
        for arg in &cli.ids {
            match arg.parse::<Kid>() {
                Ok(id) => println!(
                    "{} ts:{} seq:{:4} rnd:{:5} {} ID{{{} }}",
                    arg,
                    id.timestamp(),
                    id.sequence(),
                    id.random(),
                    DateTime::<Utc>::from(id.time()).format("%Y-%m-%d %H:%M:%S%.3f %Z"),
                    as_hex(id.as_bytes()),
                ),
                Err(err) => println!("[{}] {}", arg, err),
            }
        }
    } else {
        for _ in 0..cli.count {
            println!("{}", kid::kid());
        }
    }

    ExitCode::SUCCESS
}

fn as_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|v| format!(" {:#4x}", v))
        .collect::<Vec<_>>()
        .join(",")
}
