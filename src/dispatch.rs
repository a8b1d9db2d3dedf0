// SPDX-FileCopyrightText: 2025 RustInFinance
// SPDX-License-Identifier: BSD-3-Clause

//! Per-file strategy selection and output writing.
//!
//! Each input file is routed by its structure: XFA forms get stream
//! substitution, everything else positional page redaction. When the primary
//! library cannot handle the file at all, the copy-through fallback is tried
//! before giving up. The output file is only written when the chosen strategy
//! produced changes, except for the fallback where the copy itself is the
//! point.

use std::path::Path;

use log::{info, warn};
use lopdf::Document;

use crate::config::RestampConfig;
use crate::error::{Error, Result};
use crate::fallback::copy_through;
use crate::redact::process_document;
use crate::xfa::{has_xfa, substitute_streams};

/// Which processing path handled a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Positional redaction of the page text layer.
    Plain,
    /// XML substitution in XFA packet streams.
    Xfa,
    /// Validated copy-through with the secondary parser.
    Fallback,
}

/// Result of processing one input file.
#[derive(Debug, Clone, Copy)]
pub struct ProcessOutcome {
    /// Number of replacements performed (zero for the fallback).
    pub changes: usize,
    /// Whether an output file was written.
    pub written: bool,
    pub strategy: Strategy,
}

/// Process one PDF from `input` into `output`.
///
/// The primary strategies save the output only when at least one replacement
/// happened; an unchanged document produces no file. Primary parse failures
/// fall back to [`copy_through`]; I/O and save failures are final.
pub fn process_file(input: &Path, output: &Path, config: &RestampConfig) -> Result<ProcessOutcome> {
    or_copy_through(process_primary(input, output, config), input, output)
}

fn or_copy_through(
    primary: Result<ProcessOutcome>,
    input: &Path,
    output: &Path,
) -> Result<ProcessOutcome> {
    match primary {
        Ok(outcome) => Ok(outcome),
        Err(error) if error.allows_fallback() => {
            warn!(
                "Primary processing of {} failed ({}); trying copy-through",
                input.display(),
                error
            );
            let pages = copy_through(input, output)?;
            info!(
                "Copied {} through unchanged ({} pages)",
                input.display(),
                pages
            );
            Ok(ProcessOutcome {
                changes: 0,
                written: true,
                strategy: Strategy::Fallback,
            })
        }
        Err(error) => Err(error),
    }
}

fn process_primary(input: &Path, output: &Path, config: &RestampConfig) -> Result<ProcessOutcome> {
    let mut doc = Document::load(input)?;

    let (strategy, changes) = if has_xfa(&doc) {
        info!("{}: XFA form, substituting packet streams", input.display());
        (Strategy::Xfa, substitute_streams(&mut doc, &config.replacements)?)
    } else {
        (Strategy::Plain, process_document(&mut doc, config)?)
    };

    let written = changes > 0;
    if written {
        save(&mut doc, output)?;
    } else {
        info!("{}: no matches, not writing output", input.display());
    }
    Ok(ProcessOutcome {
        changes,
        written,
        strategy,
    })
}

fn save(doc: &mut Document, output: &Path) -> Result<()> {
    doc.save(output)
        .map(|_| ())
        .map_err(|error| Error::Save(format!("{}: {}", output.display(), error)))
}
