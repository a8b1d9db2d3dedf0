// SPDX-FileCopyrightText: 2025 RustInFinance
// SPDX-License-Identifier: BSD-3-Clause

//! Copy-through fallback for documents the primary library cannot rewrite.
//!
//! A second parser gets a chance at files that fail structural parsing, for
//! example documents with a damaged cross-reference table or empty-password
//! encryption. The document is validated page by page and, if readable,
//! copied to the output unchanged. No redaction is attempted here; a
//! readable-but-unmodified copy beats no output at all for manual follow-up.

use std::path::Path;

use log::{debug, warn};
use pdf::file::File;
use pdf::primitive::Primitive;

use crate::error::Result;

/// Validate `input` with the fallback parser and copy it to `output`.
///
/// Returns the page count of the copied document. The copy is byte-for-byte:
/// an empty-password-encrypted input stays encrypted on disk, which is
/// reported but not treated as a failure.
pub(crate) fn copy_through(input: &Path, output: &Path) -> Result<usize> {
    let file = File::<Vec<u8>>::open(input)?;
    if is_encrypted(&std::fs::read(input)?) {
        warn!(
            "{} is encrypted; the copy keeps the original encryption (empty password)",
            input.display()
        );
    }
    let mut pages = 0;
    for page in file.pages() {
        let page = page?;
        let text = page
            .contents
            .as_ref()
            .map(page_text_preview)
            .unwrap_or_default();
        debug!(
            "Fallback page {}: {} chars of text",
            pages + 1,
            text.len()
        );
        pages += 1;
    }

    std::fs::copy(input, output)?;
    Ok(pages)
}

/// Whether the raw file carries an `/Encrypt` entry in a trailer dictionary.
/// Checked on the bytes because the primary parser already failed by the
/// time we get here.
fn is_encrypted(raw: &[u8]) -> bool {
    let needle = b"/Encrypt";
    raw.windows(needle.len()).any(|window| window == needle)
}

/// Concatenate the literal text shown by a page's content operations. Used
/// only to prove the page decodes; the result is logged, never saved.
fn page_text_preview(content: &pdf::content::Content) -> String {
    let mut text = String::new();
    for operation in &content.operations {
        match operation.operator.as_str() {
            "Tj" | "'" | "\"" => {
                for operand in &operation.operands {
                    if let Primitive::String(ref value) = operand {
                        text.push_str(&String::from_utf8_lossy(value.as_bytes()));
                    }
                }
            }
            "TJ" => {
                for operand in &operation.operands {
                    if let Primitive::Array(ref items) = operand {
                        for item in items {
                            if let Primitive::String(ref value) = item {
                                text.push_str(&String::from_utf8_lossy(value.as_bytes()));
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }
    text
}
