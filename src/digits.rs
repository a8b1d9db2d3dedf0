// SPDX-FileCopyrightText: 2025 RustInFinance
// SPDX-License-Identifier: BSD-3-Clause

//! Correction of identifiers typeset as one glyph per digit.
//!
//! Some registry forms print the company identifier as individually placed
//! digit glyphs to the right of a label, which defeats string search. This
//! pass finds the label, collects the lone digit glyphs geometrically next to
//! its anchor, and restamps the first `sequence.len()` of them in reading
//! order with the replacement digits.

use log::{debug, info};
use lopdf::content::{Content, Operation};

use crate::config::DigitRestampConfig;
use crate::layout::TextSpan;
use crate::search::find_occurrences;
use crate::stamp::{blank_occurrence, stamp_ops, whiteout_ops};

/// Font size used for the stamped digits.
const DIGIT_STAMP_SIZE: f32 = 9.0;

/// Run the digit-correction heuristic on one page.
///
/// Returns the number of digit glyphs rewritten; zero when the label is
/// absent or too few qualifying glyphs are found. Whiteout and stamp
/// operations are collected into `appended` in match order.
pub(crate) fn restamp_digits(
    content: &mut Content,
    spans: &mut [TextSpan],
    config: &DigitRestampConfig,
    appended: &mut Vec<Operation>,
) -> usize {
    if find_occurrences(spans, &config.label).is_empty() {
        return 0;
    }
    let anchor = match find_occurrences(spans, &config.anchor).into_iter().next() {
        Some(anchor) => anchor,
        None => return 0,
    };

    // Lone digit glyphs on roughly the anchor's line, to its right.
    let mut candidates: Vec<usize> = (0..spans.len())
        .filter(|&index| {
            let span = &spans[index];
            span.is_digit()
                && (span.rect().y1 - anchor.rect.y1).abs() < config.vertical_tolerance
                && span.rect().x0 > anchor.rect.x1
        })
        .collect();
    candidates.sort_by(|&a, &b| {
        spans[b]
            .y
            .total_cmp(&spans[a].y)
            .then(spans[a].x.total_cmp(&spans[b].x))
    });

    let replacement: Vec<char> = config.sequence.chars().collect();
    if candidates.len() < replacement.len() {
        debug!(
            "Label '{}' present but only {} digit glyphs near anchor, need {}",
            config.label,
            candidates.len(),
            replacement.len()
        );
        return 0;
    }

    for (&index, &digit) in candidates.iter().zip(replacement.iter()) {
        let rect = spans[index].rect();
        let pieces = vec![(index, 0..spans[index].bytes.len())];
        blank_occurrence(content, spans, &pieces);
        appended.extend(whiteout_ops(&rect));
        // Centre the new digit over the old glyph box, just above its bottom.
        let x = (rect.x0 + rect.x1) / 2.0 - 3.0;
        let y = rect.y0 + 1.0;
        appended.extend(stamp_ops(DIGIT_STAMP_SIZE, x, y, &digit.to_string()));
    }

    info!(
        "Corrected {} digit glyphs next to '{}'",
        replacement.len(),
        config.anchor
    );
    replacement.len()
}
