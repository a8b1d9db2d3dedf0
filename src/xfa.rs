// SPDX-FileCopyrightText: 2025 RustInFinance
// SPDX-License-Identifier: BSD-3-Clause

//! Text substitution inside XFA form packets.
//!
//! XFA documents render from XML packets stored as streams under
//! `/Root/AcroForm/XFA`, so the page text layer is useless for redaction.
//! Instead every packet stream is inflated, the replacement pairs are applied
//! to the XML source, and the stream is re-compressed in place. A stream that
//! fails to decompress is skipped with a warning rather than failing the
//! whole document.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::{info, warn};
use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::Result;

/// Whether the document carries an XFA form. Keyed on the presence of the
/// `XFA` entry, not on resolvable packet streams: the page text layer of
/// such a form is useless even when its packets are malformed.
pub(crate) fn has_xfa(doc: &Document) -> bool {
    acro_form(doc).map(|dict| dict.has(b"XFA")).unwrap_or(false)
}

fn acro_form(doc: &Document) -> Option<&Dictionary> {
    match doc
        .catalog()
        .and_then(|catalog| catalog.get(b"AcroForm"))
        .and_then(|object| resolve(doc, object))
    {
        Ok(Object::Dictionary(dict)) => Some(dict),
        _ => None,
    }
}

/// Stream object ids of every XFA packet, in document order.
pub(crate) fn xfa_stream_ids(doc: &Document) -> Vec<ObjectId> {
    let acro_form = match acro_form(doc) {
        Some(dict) => dict,
        None => return Vec::new(),
    };
    let xfa = match acro_form.get(b"XFA") {
        Ok(object) => object,
        Err(_) => return Vec::new(),
    };

    let mut ids = Vec::new();
    match xfa {
        // The array alternates packet names and stream references.
        Object::Array(items) => {
            for item in items {
                if let Object::Reference(id) = item {
                    if matches!(doc.get_object(*id), Ok(Object::Stream(_))) {
                        ids.push(*id);
                    }
                }
            }
        }
        Object::Reference(id) => {
            if matches!(doc.get_object(*id), Ok(Object::Stream(_))) {
                ids.push(*id);
            }
        }
        _ => {}
    }
    ids
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> lopdf::Result<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id),
        other => Ok(other),
    }
}

/// Apply the replacement pairs to every XFA packet of `doc`.
///
/// Returns the total number of substitutions across all packets.
pub(crate) fn substitute_streams(
    doc: &mut Document,
    replacements: &[(String, String)],
) -> Result<usize> {
    let ids = xfa_stream_ids(doc);
    let mut total = 0;
    for id in ids {
        match rewrite_stream(doc, id, replacements) {
            Ok(count) => total += count,
            Err(error) => {
                warn!("Skipping XFA stream {:?}: {}", id, error);
            }
        }
    }
    Ok(total)
}

fn rewrite_stream(
    doc: &mut Document,
    id: ObjectId,
    replacements: &[(String, String)],
) -> Result<usize> {
    let (xml, was_compressed) = {
        let stream = doc.get_object(id)?.as_stream()?;
        match inflate(&stream.content) {
            Ok(decoded) => (String::from_utf8_lossy(&decoded).into_owned(), true),
            // Packets are allowed to be stored uncompressed.
            Err(_) => (String::from_utf8_lossy(&stream.content).into_owned(), false),
        }
    };

    let (rewritten, count) = apply_replacements(&xml, replacements);
    if count == 0 {
        return Ok(0);
    }

    let (content, compressed) = if was_compressed {
        match deflate(rewritten.as_bytes()) {
            Ok(data) => (data, true),
            Err(_) => (rewritten.into_bytes(), false),
        }
    } else {
        (rewritten.into_bytes(), false)
    };

    if let Object::Stream(ref mut stream) = doc.get_object_mut(id)? {
        stream.content = content;
        stream
            .dict
            .set("Length", Object::Integer(stream.content.len() as i64));
        if compressed {
            stream.dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
        } else {
            stream.dict.remove(b"Filter");
        }
    }
    Ok(count)
}

/// Replace every pair in `xml`, returning the new text and the match count.
fn apply_replacements(xml: &str, replacements: &[(String, String)]) -> (String, usize) {
    let mut text = xml.to_string();
    let mut count = 0;
    for (search, replacement) in replacements {
        let matches = text.matches(search.as_str()).count();
        if matches > 0 {
            info!("XFA: replacing '{}' -> '{}' ({}x)", search, replacement, matches);
            text = text.replace(search.as_str(), replacement);
            count += matches;
        }
    }
    (text, count)
}

fn inflate(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut decoded = Vec::new();
    decoder.read_to_end(&mut decoded)?;
    Ok(decoded)
}

fn deflate(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::xfa_doc;
    use lopdf::dictionary;

    const DATASET: &str =
        "<xdp><field>SC TIP B SRL</field><cui>886577611</cui><field>SC TIP B SRL</field></xdp>";

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter()
            .map(|(s, r)| (s.to_string(), r.to_string()))
            .collect()
    }

    #[test]
    fn test_detects_xfa_entry() {
        let (doc, _) = xfa_doc(DATASET, true);
        assert!(has_xfa(&doc));
        assert!(!has_xfa(&Document::with_version("1.5")));
    }

    #[test]
    fn test_xfa_key_without_packet_streams_still_routes() {
        let (mut doc, _) = crate::testutil::single_page_doc(vec![]);
        let acro_form_id = doc.add_object(dictionary! {
            "XFA" => Object::Array(vec![]),
        });
        let catalog_id = doc
            .trailer
            .get(b"Root")
            .and_then(|root| root.as_reference())
            .unwrap();
        doc.get_object_mut(catalog_id)
            .unwrap()
            .as_dict_mut()
            .unwrap()
            .set("AcroForm", Object::Reference(acro_form_id));

        assert!(has_xfa(&doc));
        assert!(xfa_stream_ids(&doc).is_empty());
        let count =
            substitute_streams(&mut doc, &pairs(&[("SC TIP B SRL", "SC IOANA SRL")])).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_substitution_in_compressed_packet() {
        let (mut doc, stream_id) = xfa_doc(DATASET, true);
        let replacements = pairs(&[("SC TIP B SRL", "SC IOANA SRL"), ("886577611", "34353611")]);

        let count = substitute_streams(&mut doc, &replacements).unwrap();
        assert_eq!(count, 3);

        let stream = doc.get_object(stream_id).unwrap().as_stream().unwrap();
        let xml = String::from_utf8(inflate(&stream.content).unwrap()).unwrap();
        assert!(!xml.contains("SC TIP B SRL"));
        assert_eq!(xml.matches("SC IOANA SRL").count(), 2);
        assert!(xml.contains("34353611"));
    }

    #[test]
    fn test_substitution_in_uncompressed_packet() {
        let (mut doc, stream_id) = xfa_doc(DATASET, false);
        let replacements = pairs(&[("886577611", "34353611")]);

        let count = substitute_streams(&mut doc, &replacements).unwrap();
        assert_eq!(count, 1);

        let stream = doc.get_object(stream_id).unwrap().as_stream().unwrap();
        let xml = String::from_utf8(stream.content.clone()).unwrap();
        assert!(xml.contains("34353611"));
        assert!(!stream.dict.has(b"Filter"));
    }

    #[test]
    fn test_unmatched_packet_is_left_alone() {
        let (mut doc, stream_id) = xfa_doc(DATASET, true);
        let before = doc
            .get_object(stream_id)
            .unwrap()
            .as_stream()
            .unwrap()
            .content
            .clone();

        let count = substitute_streams(&mut doc, &pairs(&[("absent", "text")])).unwrap();
        assert_eq!(count, 0);

        let after = &doc.get_object(stream_id).unwrap().as_stream().unwrap().content;
        assert_eq!(&before, after);
    }

    #[test]
    fn test_apply_replacements_counts_each_pair() {
        let (text, count) = apply_replacements(
            "aa bb aa",
            &pairs(&[("aa", "xx"), ("bb", "yy"), ("cc", "zz")]),
        );
        assert_eq!(text, "xx yy xx");
        assert_eq!(count, 3);
    }
}
