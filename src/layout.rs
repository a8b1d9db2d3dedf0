// SPDX-FileCopyrightText: 2025 RustInFinance
// SPDX-License-Identifier: BSD-3-Clause

//! Positioned text extraction from page content streams.
//!
//! A single pass over the decoded operations tracks the text cursor through
//! `Tm`/`Td`/`TD`/`T*`/`TL` and records one span per shown string (`Tj`, `'`,
//! `"`, and each string element of a `TJ` array). Only translation and axis
//! scale are honoured; rotated text is not a concern for the fixed-layout
//! forms this tool targets. Glyph widths are estimated with a fixed average
//! width factor, which is plenty for locating redaction boxes.

use std::borrow::Cow;
use std::ops::Range;

use lopdf::content::Content;
use lopdf::Object;

/// Estimated advance per glyph as a fraction of the font size.
pub(crate) const AVG_GLYPH_WIDTH: f32 = 0.5;

/// Fraction of the font size extending below the baseline.
const DESCENT: f32 = 0.25;
/// Fraction of the font size extending above the baseline.
const ASCENT: f32 = 0.75;

/// Axis-aligned rectangle in PDF user space (y grows upward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    pub fn expand(&self, margin: f32) -> Rect {
        Rect {
            x0: self.x0 - margin,
            y0: self.y0 - margin,
            x1: self.x1 + margin,
            y1: self.y1 + margin,
        }
    }
}

/// One shown string with its position and the address of the operand that
/// produced it, so the raw bytes can be rewritten in place later.
#[derive(Debug, Clone)]
pub(crate) struct TextSpan {
    /// Raw string bytes as stored in the content stream (one byte per glyph
    /// for the simple fonts this tool handles).
    pub bytes: Vec<u8>,
    /// Baseline origin of the first glyph.
    pub x: f32,
    pub y: f32,
    /// Effective font size (nominal size times vertical text-matrix scale).
    pub size: f32,
    /// Estimated advance per glyph.
    pub advance: f32,
    /// Index of the producing operation within the decoded content.
    pub op_index: usize,
    /// Index of the string operand within the operation.
    pub operand_index: usize,
    /// For `TJ`, the index of the string element inside the array operand.
    pub element: Option<usize>,
}

impl TextSpan {
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    pub fn is_digit(&self) -> bool {
        self.bytes.len() == 1 && self.bytes[0].is_ascii_digit()
    }

    pub fn rect(&self) -> Rect {
        self.char_range_rect(0..self.bytes.len())
    }

    /// Bounding box of a byte range within this span.
    pub fn char_range_rect(&self, range: Range<usize>) -> Rect {
        Rect {
            x0: self.x + range.start as f32 * self.advance,
            x1: self.x + range.end as f32 * self.advance,
            y0: self.y - DESCENT * self.size,
            y1: self.y + ASCENT * self.size,
        }
    }
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value),
        _ => None,
    }
}

/// Walk the content operations and collect positioned spans.
///
/// UTF-16BE strings (identified by their byte order mark) are advanced over
/// but not recorded: rewriting composite-font text is out of scope.
pub(crate) fn collect_spans(content: &Content) -> Vec<TextSpan> {
    let mut spans = Vec::new();

    let mut font_size = 0.0f32;
    let mut leading = 0.0f32;
    // Horizontal and vertical scale from the latest Tm.
    let (mut sx, mut sy) = (1.0f32, 1.0f32);
    // Current line origin and cursor position.
    let (mut lx, mut ly) = (0.0f32, 0.0f32);
    let (mut cx, mut cy) = (0.0f32, 0.0f32);

    let mut show = |bytes: &[u8],
                    cx: &mut f32,
                    cy: f32,
                    op_index: usize,
                    operand_index: usize,
                    element: Option<usize>,
                    font_size: f32,
                    sx: f32,
                    sy: f32| {
        let advance = font_size * sx * AVG_GLYPH_WIDTH;
        if bytes.starts_with(&[0xFE, 0xFF]) {
            // Composite-font text: keep the cursor honest, skip the span.
            *cx += (bytes.len().saturating_sub(2) / 2) as f32 * advance;
            return;
        }
        spans.push(TextSpan {
            bytes: bytes.to_vec(),
            x: *cx,
            y: cy,
            size: font_size * sy,
            advance,
            op_index,
            operand_index,
            element,
        });
        *cx += bytes.len() as f32 * advance;
    };

    for (op_index, op) in content.operations.iter().enumerate() {
        match op.operator.as_str() {
            "BT" => {
                sx = 1.0;
                sy = 1.0;
                lx = 0.0;
                ly = 0.0;
                cx = 0.0;
                cy = 0.0;
            }
            "Tf" => {
                if let Some(size) = op.operands.get(1).and_then(number) {
                    font_size = size;
                }
            }
            "TL" => {
                if let Some(value) = op.operands.first().and_then(number) {
                    leading = value;
                }
            }
            "Tm" => {
                let m: Vec<f32> = op.operands.iter().filter_map(number).collect();
                if m.len() == 6 {
                    sx = m[0];
                    sy = m[3];
                    lx = m[4];
                    ly = m[5];
                    cx = lx;
                    cy = ly;
                }
            }
            "Td" | "TD" => {
                if let (Some(tx), Some(ty)) = (
                    op.operands.first().and_then(number),
                    op.operands.get(1).and_then(number),
                ) {
                    if op.operator == "TD" {
                        leading = -ty;
                    }
                    lx += tx * sx;
                    ly += ty * sy;
                    cx = lx;
                    cy = ly;
                }
            }
            "T*" => {
                ly -= leading * sy;
                cx = lx;
                cy = ly;
            }
            "Tj" => {
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    show(bytes, &mut cx, cy, op_index, 0, None, font_size, sx, sy);
                }
            }
            "'" => {
                ly -= leading * sy;
                cx = lx;
                cy = ly;
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    show(bytes, &mut cx, cy, op_index, 0, None, font_size, sx, sy);
                }
            }
            "\"" => {
                ly -= leading * sy;
                cx = lx;
                cy = ly;
                if let Some(Object::String(bytes, _)) = op.operands.get(2) {
                    show(bytes, &mut cx, cy, op_index, 2, None, font_size, sx, sy);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = op.operands.first() {
                    for (element, item) in items.iter().enumerate() {
                        match item {
                            Object::String(bytes, _) => {
                                show(
                                    bytes,
                                    &mut cx,
                                    cy,
                                    op_index,
                                    0,
                                    Some(element),
                                    font_size,
                                    sx,
                                    sy,
                                );
                            }
                            other => {
                                if let Some(adjustment) = number(other) {
                                    cx -= adjustment / 1000.0 * font_size * sx;
                                }
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::Operation;

    fn decode(ops: Vec<Operation>) -> Vec<TextSpan> {
        collect_spans(&Content { operations: ops })
    }

    #[test]
    fn test_simple_tj_span_position() {
        let spans = decode(vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 10.into()]),
            Operation::new("Td", vec![50.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal("Hello")]),
            Operation::new("ET", vec![]),
        ]);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text(), "Hello");
        assert_eq!(spans[0].x, 50.0);
        assert_eq!(spans[0].y, 700.0);
        assert_eq!(spans[0].size, 10.0);
        assert_eq!(spans[0].advance, 5.0);
    }

    #[test]
    fn test_tj_array_elements_advance() {
        let spans = decode(vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 10.into()]),
            Operation::new("Td", vec![100.into(), 600.into()]),
            Operation::new(
                "TJ",
                vec![Object::Array(vec![
                    Object::string_literal("AB"),
                    Object::Integer(-200),
                    Object::string_literal("CD"),
                ])],
            ),
            Operation::new("ET", vec![]),
        ]);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].element, Some(0));
        assert_eq!(spans[1].element, Some(2));
        // Two glyphs at 5.0 advance plus the 200/1000 kerning adjustment.
        assert_eq!(spans[1].x, 100.0 + 10.0 + 2.0);
    }

    #[test]
    fn test_line_advance_via_td_and_tstar() {
        let spans = decode(vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("TL", vec![14.into()]),
            Operation::new("Td", vec![40.into(), 500.into()]),
            Operation::new("Tj", vec![Object::string_literal("first")]),
            Operation::new("T*", vec![]),
            Operation::new("Tj", vec![Object::string_literal("second")]),
            Operation::new("ET", vec![]),
        ]);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[1].x, 40.0);
        assert_eq!(spans[1].y, 500.0 - 14.0);
    }

    #[test]
    fn test_tm_scale_applies_to_size() {
        let spans = decode(vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 1.into()]),
            Operation::new(
                "Tm",
                vec![
                    12.into(),
                    0.into(),
                    0.into(),
                    12.into(),
                    30.into(),
                    400.into(),
                ],
            ),
            Operation::new("Tj", vec![Object::string_literal("x")]),
            Operation::new("ET", vec![]),
        ]);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].size, 12.0);
        assert_eq!(spans[0].x, 30.0);
        assert_eq!(spans[0].y, 400.0);
    }

    #[test]
    fn test_utf16_strings_are_skipped() {
        let spans = decode(vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 10.into()]),
            Operation::new(
                "Tj",
                vec![Object::String(
                    vec![0xFE, 0xFF, 0x00, 0x41],
                    lopdf::StringFormat::Hexadecimal,
                )],
            ),
            Operation::new("Tj", vec![Object::string_literal("plain")]),
            Operation::new("ET", vec![]),
        ]);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text(), "plain");
        // The skipped glyph still advanced the cursor.
        assert_eq!(spans[0].x, 5.0);
    }

    #[test]
    fn test_char_range_rect() {
        let span = TextSpan {
            bytes: b"0123456789".to_vec(),
            x: 100.0,
            y: 200.0,
            size: 10.0,
            advance: 5.0,
            op_index: 0,
            operand_index: 0,
            element: None,
        };
        let rect = span.char_range_rect(2..4);
        assert_eq!(rect.x0, 110.0);
        assert_eq!(rect.x1, 120.0);
        assert_eq!(rect.y0, 197.5);
        assert_eq!(rect.y1, 207.5);
    }
}
