//! Run the roster extraction on a local PDF and print the JSON mapping.
//!
//! Handy for checking a new roster export against the line heuristics
//! without going through the server:
//!   RUST_LOG=debug roster-extract roster.pdf

use assessment_bridge_lib::roster::{self, ExtractionOptions};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "roster-extract", version, about = "Extract U-number -> name/major from a roster PDF")]
struct Args {
    /// Roster PDF
    file: PathBuf,
    /// Identifier prefix letter
    #[arg(long, default_value_t = 'U')]
    prefix: char,
    /// Title banner line prefix to ignore
    #[arg(long, default_value = "USF Photo Roster")]
    banner: String,
    /// Lines containing "Major" shorter than this are treated as headers
    #[arg(long, default_value_t = 50)]
    major_header_max_len: usize,
    /// Print the raw extracted lines that survive filtering instead of records
    #[arg(long)]
    lines: bool,
}

fn main() {
    assessment_bridge_lib::init_logging("warn");
    let args = Args::parse();

    let opts = ExtractionOptions {
        identifier_prefix: args.prefix,
        title_banner: args.banner,
        major_header_max_len: args.major_header_max_len,
    };

    let bytes = match std::fs::read(&args.file) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Failed to read {}: {}", args.file.display(), e);
            std::process::exit(1);
        }
    };

    if args.lines {
        let pages = match roster::pdf_extractor::extract_pages(&bytes) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        };
        for (i, page) in pages.iter().enumerate() {
            println!("--- page {} ---", i + 1);
            for line in roster::line_filter::surviving_lines(page, &opts) {
                println!("{}", line);
            }
        }
        return;
    }

    let filename = args.file.to_string_lossy();
    match roster::roster_from_upload(&filename, &bytes, &opts) {
        Ok(mapping) => match serde_json::to_string_pretty(&mapping) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize roster: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
