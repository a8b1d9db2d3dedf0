// SPDX-FileCopyrightText: 2025 RustInFinance
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for PDF restamping.
//!
//! The primary strategies (page redaction, XFA stream substitution) go through
//! `lopdf`; their failures are recoverable in the sense that the copy-through
//! fallback can still produce an output file. Failures while writing the
//! output, or failures of the fallback itself, are final.

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The primary library failed to open or rewrite the document.
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Page content was structurally not processable.
    #[error("content error: {0}")]
    Content(String),

    /// Writing the rewritten document failed.
    #[error("cannot save output: {0}")]
    Save(String),

    /// The copy-through fallback failed as well.
    #[error("fallback error: {0}")]
    Fallback(#[from] pdf::error::PdfError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Whether the copy-through fallback may still be attempted after this
    /// failure. Only failures of the primary library qualify; output I/O
    /// problems would hit the fallback just the same.
    pub fn allows_fallback(&self) -> bool {
        matches!(self, Error::Pdf(_) | Error::Content(_))
    }
}
