// SPDX-FileCopyrightText: 2025 RustInFinance
// SPDX-License-Identifier: BSD-3-Clause

//! Batch processing of a folder of PDFs.
//!
//! The input folder is scanned non-recursively for `*.pdf` files, which are
//! processed one after another. A failing file is reported and skipped; it
//! never aborts the batch. A file counts as succeeded only when an output
//! file was actually written.

use std::path::Path;

use log::error;

use crate::config::RestampConfig;
use crate::dispatch::process_file;
use crate::error::Result;

/// Tally of one batch run.
#[derive(Debug, Default, Clone, Copy)]
pub struct BatchReport {
    /// PDF files considered.
    pub total: usize,
    /// Files for which an output was written.
    pub succeeded: usize,
}

impl BatchReport {
    pub fn summary(&self) -> String {
        format!(
            "Successfully processed: {}/{} files",
            self.succeeded, self.total
        )
    }
}

/// Process every `*.pdf` directly inside `input_dir` into `output_dir`.
///
/// Output files keep their name with `prefix` prepended. The output folder is
/// created if missing. Files are handled in name order so runs are
/// reproducible.
pub fn process_directory(
    input_dir: &Path,
    output_dir: &Path,
    prefix: &str,
    config: &RestampConfig,
) -> Result<BatchReport> {
    std::fs::create_dir_all(output_dir)?;

    let mut inputs: Vec<_> = std::fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                    .unwrap_or(false)
        })
        .collect();
    inputs.sort();

    let mut report = BatchReport {
        total: inputs.len(),
        ..BatchReport::default()
    };

    for (index, input) in inputs.iter().enumerate() {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("[{}/{}] {}", index + 1, report.total, name);

        let output = output_dir.join(format!("{}{}", prefix, name));
        match process_file(input, &output, config) {
            Ok(outcome) if outcome.written => report.succeeded += 1,
            Ok(_) => {}
            Err(err) => {
                error!("Failed to process {}: {}", name, err);
            }
        }
    }
    Ok(report)
}
