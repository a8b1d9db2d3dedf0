// SPDX-FileCopyrightText: 2025 RustInFinance
// SPDX-License-Identifier: BSD-3-Clause

//! Redaction primitives: blanking matched bytes in place, painting a white
//! box over the old glyphs, and emitting the operations that draw the
//! replacement text. The replacement is always set in a Helvetica resource
//! registered under a name unlikely to collide with existing page fonts.

use std::ops::Range;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};

use crate::error::Result;
use crate::layout::{Rect, TextSpan};

/// Resource name of the font used for stamped text.
pub(crate) const STAMP_FONT: &str = "RsF1";

/// How far the whiteout box extends past the matched glyph box.
pub(crate) const WHITEOUT_MARGIN: f32 = 2.0;

/// Overwrite the matched bytes with spaces, both in the recorded span and in
/// the string operand of the originating operation. The glyph count stays the
/// same so every later span keeps its position.
pub(crate) fn blank_occurrence(
    content: &mut Content,
    spans: &mut [TextSpan],
    pieces: &[(usize, Range<usize>)],
) {
    for (span_index, range) in pieces {
        let span = &mut spans[*span_index];
        for byte in &mut span.bytes[range.clone()] {
            *byte = b' ';
        }

        let op = &mut content.operations[span.op_index];
        let operand = match span.element {
            Some(element) => match op.operands.get_mut(span.operand_index) {
                Some(Object::Array(items)) => items.get_mut(element),
                _ => None,
            },
            None => op.operands.get_mut(span.operand_index),
        };
        if let Some(Object::String(bytes, _)) = operand {
            if range.end <= bytes.len() {
                for byte in &mut bytes[range.clone()] {
                    *byte = b' ';
                }
            }
        }
    }
}

/// Operations painting an opaque white rectangle over `rect`.
pub(crate) fn whiteout_ops(rect: &Rect) -> Vec<Operation> {
    let rect = rect.expand(WHITEOUT_MARGIN);
    vec![
        Operation::new("q", vec![]),
        Operation::new("rg", vec![1.into(), 1.into(), 1.into()]),
        Operation::new(
            "re",
            vec![
                rect.x0.into(),
                rect.y0.into(),
                rect.width().into(),
                rect.height().into(),
            ],
        ),
        Operation::new("f", vec![]),
        Operation::new("Q", vec![]),
    ]
}

/// Operations drawing `text` in black at baseline `(x, y)`.
pub(crate) fn stamp_ops(size: f32, x: f32, y: f32, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![STAMP_FONT.into(), size.into()]),
        Operation::new("rg", vec![0.into(), 0.into(), 0.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
    ]
}

/// Register the stamp font in the page's font resources, creating the
/// `Resources` and `Font` dictionaries if the page has neither. Existing font
/// entries are left untouched.
pub(crate) fn ensure_stamp_font(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let font_ref = Object::Reference(doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    }));

    // Resources and Font may each be inline or an indirect reference; find
    // out first, mutate second.
    let (resources_id, font_dict_id) = {
        let page = doc.get_object(page_id)?.as_dict()?;
        let resources_id = match page.get(b"Resources") {
            Ok(Object::Reference(id)) => Some(*id),
            _ => None,
        };
        let resources = match resources_id {
            Some(id) => doc.get_object(id)?.as_dict().ok(),
            None => page.get(b"Resources").and_then(|o| o.as_dict()).ok(),
        };
        let font_dict_id = match resources.and_then(|r| r.get(b"Font").ok()) {
            Some(Object::Reference(id)) => Some(*id),
            _ => None,
        };
        (resources_id, font_dict_id)
    };

    if let Some(id) = font_dict_id {
        let font = doc.get_object_mut(id)?.as_dict_mut()?;
        font.set(STAMP_FONT, font_ref);
        return Ok(());
    }

    match resources_id {
        Some(id) => {
            let resources = doc.get_object_mut(id)?.as_dict_mut()?;
            font_entry(resources)?.set(STAMP_FONT, font_ref);
        }
        None => {
            let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
            if page.get(b"Resources").and_then(|o| o.as_dict()).is_err() {
                page.set("Resources", Dictionary::new());
            }
            let resources = page.get_mut(b"Resources")?.as_dict_mut()?;
            font_entry(resources)?.set(STAMP_FONT, font_ref);
        }
    }
    Ok(())
}

fn font_entry(resources: &mut Dictionary) -> Result<&mut Dictionary> {
    if resources.get(b"Font").and_then(|o| o.as_dict()).is_err() {
        resources.set("Font", Dictionary::new());
    }
    Ok(resources.get_mut(b"Font")?.as_dict_mut()?)
}
