// SPDX-FileCopyrightText: 2025 RustInFinance
// SPDX-License-Identifier: BSD-3-Clause

//! In-memory PDF fixtures shared by the unit tests.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// One line of text at `(x, y)` in the page's F1 font.
pub(crate) fn text_op(x: f32, y: f32, size: f32, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
    ]
}

/// Minimal single-page document around the given content operations.
/// Returns the document and the page's object id.
pub(crate) fn single_page_doc(operations: Vec<Operation>) -> (Document, ObjectId) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("encode fixture content"),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "Contents" => Object::Reference(content_id),
        "Resources" => dictionary! {
            "Font" => dictionary! {
                "F1" => Object::Reference(font_id),
            },
        },
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));
    (doc, page_id)
}

/// Document carrying an XFA form whose single packet stream holds `xml`.
/// Returns the document and the packet stream's object id.
pub(crate) fn xfa_doc(xml: &str, compressed: bool) -> (Document, ObjectId) {
    let (mut doc, _) = single_page_doc(text_op(50.0, 700.0, 10.0, "rendered by XFA"));

    let content = if compressed {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(xml.as_bytes())
            .expect("compress fixture packet");
        encoder.finish().expect("compress fixture packet")
    } else {
        xml.as_bytes().to_vec()
    };
    let mut stream = Stream::new(dictionary! {}, content);
    if compressed {
        stream.dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
    }
    let stream_id = doc.add_object(Object::Stream(stream));

    let acro_form_id = doc.add_object(dictionary! {
        "XFA" => vec![
            Object::string_literal("datasets"),
            Object::Reference(stream_id),
        ],
    });
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(|root| root.as_reference())
        .expect("fixture catalog");
    if let Ok(catalog) = doc
        .get_object_mut(catalog_id)
        .and_then(|object| object.as_dict_mut())
    {
        catalog.set("AcroForm", Object::Reference(acro_form_id));
    }
    (doc, stream_id)
}

/// Visible text of a page, in operation order.
pub(crate) fn page_text(doc: &Document, page_id: ObjectId) -> String {
    let data = doc.get_page_content(page_id).expect("fixture page content");
    let content = Content::decode(&data).expect("decode fixture content");
    let mut text = String::new();
    for op in &content.operations {
        match op.operator.as_str() {
            "Tj" | "'" => {
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    text.push_str(&String::from_utf8_lossy(bytes));
                }
            }
            "\"" => {
                if let Some(Object::String(bytes, _)) = op.operands.get(2) {
                    text.push_str(&String::from_utf8_lossy(bytes));
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = op.operands.first() {
                    for item in items {
                        if let Object::String(bytes, _) = item {
                            text.push_str(&String::from_utf8_lossy(bytes));
                        }
                    }
                }
            }
            _ => {}
        }
    }
    text
}
