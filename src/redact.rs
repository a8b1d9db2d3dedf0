// SPDX-FileCopyrightText: 2025 RustInFinance
// SPDX-License-Identifier: BSD-3-Clause

//! Page-level redact-and-restamp for plain text-layer PDFs.
//!
//! Every page is processed independently: decode the content stream, locate
//! each configured search string, blank its bytes, paint a whiteout box over
//! the old glyphs and stamp the replacement at the same baseline. The digit
//! correction pass runs after the string passes. A page is only re-encoded
//! when something actually changed.

use log::info;
use lopdf::content::{Content, Operation};
use lopdf::{Document, ObjectId};

use crate::config::RestampConfig;
use crate::digits::restamp_digits;
use crate::error::{Error, Result};
use crate::layout::collect_spans;
use crate::search::find_occurrences;
use crate::stamp::{blank_occurrence, ensure_stamp_font, stamp_ops, whiteout_ops};

/// Smallest font size used for stamped replacement text.
const MIN_STAMP_SIZE: f32 = 8.0;
/// Largest font size used for stamped replacement text.
const MAX_STAMP_SIZE: f32 = 12.0;

/// Rewrite every page of `doc` according to `config`.
///
/// Returns the total number of replacements performed (string matches plus
/// corrected digit glyphs). Zero means the document was left untouched.
pub(crate) fn process_document(doc: &mut Document, config: &RestampConfig) -> Result<usize> {
    let pages: Vec<(u32, ObjectId)> = doc.get_pages().into_iter().collect();
    let mut total = 0;
    for (number, page_id) in pages {
        let changes = process_page(doc, page_id, config)?;
        if changes > 0 {
            info!("Page {}: {} replacements", number, changes);
        }
        total += changes;
    }
    Ok(total)
}

fn process_page(doc: &mut Document, page_id: ObjectId, config: &RestampConfig) -> Result<usize> {
    let data = doc.get_page_content(page_id)?;
    let mut content = Content::decode(&data)
        .map_err(|error| Error::Content(format!("page {:?}: {}", page_id, error)))?;
    let mut spans = collect_spans(&content);

    let mut appended: Vec<Operation> = Vec::new();
    let mut changes = 0;

    for (search, replacement) in &config.replacements {
        let occurrences = find_occurrences(&spans, search);
        if occurrences.is_empty() {
            continue;
        }
        info!("Found '{}' at {} positions", search, occurrences.len());
        for occurrence in &occurrences {
            blank_occurrence(&mut content, &mut spans, &occurrence.pieces);
            appended.extend(whiteout_ops(&occurrence.rect));
            let size = (occurrence.rect.height() * 0.7).clamp(MIN_STAMP_SIZE, MAX_STAMP_SIZE);
            appended.extend(stamp_ops(
                size,
                occurrence.rect.x0 + 1.0,
                occurrence.baseline,
                replacement,
            ));
        }
        info!(
            "Replaced '{}' -> '{}' ({}x)",
            search,
            replacement,
            occurrences.len()
        );
        changes += occurrences.len();
    }

    changes += restamp_digits(&mut content, &mut spans, &config.digits, &mut appended);

    if changes > 0 {
        ensure_stamp_font(doc, page_id)?;
        content.operations.extend(appended);
        let encoded = content.encode()?;
        doc.change_page_content(page_id, encoded)?;
    }
    Ok(changes)
}
