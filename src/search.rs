// SPDX-FileCopyrightText: 2025 RustInFinance
// SPDX-License-Identifier: BSD-3-Clause

//! Literal occurrence search over positioned spans.
//!
//! Spans are grouped into visual lines by baseline proximity, concatenated
//! left to right, and the needle is matched byte-wise, non-overlapping. Each
//! occurrence keeps the operand ranges that produced it so the matched bytes
//! can be blanked in the content stream afterwards.

use std::ops::Range;

use crate::layout::{Rect, TextSpan};

/// Baseline distance within which spans count as the same line.
const LINE_TOLERANCE: f32 = 2.0;

/// A located instance of a search string on a page.
#[derive(Debug, Clone)]
pub(crate) struct Occurrence {
    /// Union of the matched glyph boxes.
    pub rect: Rect,
    /// Baseline of the first matched glyph.
    pub baseline: f32,
    /// `(span index, byte range)` pieces covering the match, in text order.
    pub pieces: Vec<(usize, Range<usize>)>,
}

/// Group span indices into lines, top to bottom, each line left to right.
pub(crate) fn group_lines(spans: &[TextSpan]) -> Vec<Vec<usize>> {
    let mut order: Vec<usize> = (0..spans.len()).collect();
    order.sort_by(|&a, &b| {
        spans[b]
            .y
            .total_cmp(&spans[a].y)
            .then(spans[a].x.total_cmp(&spans[b].x))
    });

    let mut lines: Vec<Vec<usize>> = Vec::new();
    let mut line_y = f32::INFINITY;
    for index in order {
        if (line_y - spans[index].y).abs() <= LINE_TOLERANCE {
            if let Some(line) = lines.last_mut() {
                line.push(index);
            }
        } else {
            line_y = spans[index].y;
            lines.push(vec![index]);
        }
    }
    for line in &mut lines {
        line.sort_by(|&a, &b| spans[a].x.total_cmp(&spans[b].x));
    }
    lines
}

/// Find all visual occurrences of `needle` among `spans`.
///
/// Matching is literal and byte-wise; occurrences never span lines. Returns
/// them in line order; zero occurrences is a normal outcome.
pub(crate) fn find_occurrences(spans: &[TextSpan], needle: &str) -> Vec<Occurrence> {
    let needle = needle.as_bytes();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut occurrences = Vec::new();
    for line in group_lines(spans) {
        // Concatenate the line and remember which span byte each position
        // came from.
        let mut buffer: Vec<u8> = Vec::new();
        let mut owner: Vec<(usize, usize)> = Vec::new();
        for &span_index in &line {
            for (offset, &byte) in spans[span_index].bytes.iter().enumerate() {
                buffer.push(byte);
                owner.push((span_index, offset));
            }
        }

        let mut position = 0;
        while position + needle.len() <= buffer.len() {
            if &buffer[position..position + needle.len()] != needle {
                position += 1;
                continue;
            }
            let pieces = collect_pieces(&owner[position..position + needle.len()]);
            let rect = pieces
                .iter()
                .map(|(span_index, range)| spans[*span_index].char_range_rect(range.clone()))
                .reduce(|a, b| a.union(&b))
                .expect("non-empty match");
            let baseline = spans[pieces[0].0].y;
            occurrences.push(Occurrence {
                rect,
                baseline,
                pieces,
            });
            position += needle.len();
        }
    }
    occurrences
}

/// Fold per-byte owners into contiguous `(span, range)` pieces.
fn collect_pieces(owners: &[(usize, usize)]) -> Vec<(usize, Range<usize>)> {
    let mut pieces: Vec<(usize, Range<usize>)> = Vec::new();
    for &(span_index, offset) in owners {
        match pieces.last_mut() {
            Some((last_span, range)) if *last_span == span_index && range.end == offset => {
                range.end = offset + 1;
            }
            _ => pieces.push((span_index, offset..offset + 1)),
        }
    }
    pieces
}
