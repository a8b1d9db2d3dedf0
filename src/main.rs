// SPDX-FileCopyrightText: 2025 RustInFinance
// SPDX-License-Identifier: BSD-3-Clause

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;

use pdf_restamp::{process_directory, RestampConfig, DEFAULT_OUTPUT_SUBDIR, OUTPUT_PREFIX};

/// Redact and restamp a folder of PDF documents.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Folder scanned (non-recursively) for *.pdf files
    #[arg(default_value = ".")]
    input_dir: PathBuf,

    /// Output folder; defaults to a "Modified" subfolder of the input
    output_dir: Option<PathBuf>,

    /// Prefix prepended to every output filename
    #[arg(long, default_value = OUTPUT_PREFIX)]
    prefix: String,

    /// Log every processing step
    #[arg(long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    simple_logger::SimpleLogger::new()
        .with_level(level)
        .init()
        .expect("Error initializing logging");

    let output_dir = args
        .output_dir
        .unwrap_or_else(|| args.input_dir.join(DEFAULT_OUTPUT_SUBDIR));

    let config = RestampConfig::default();
    match process_directory(&args.input_dir, &output_dir, &args.prefix, &config) {
        Ok(report) => {
            println!("=== FINAL REPORT ===");
            println!("{}", report.summary());
            println!("Output folder: {}", output_dir.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Batch run failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
