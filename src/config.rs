// SPDX-FileCopyrightText: 2025 RustInFinance
// SPDX-License-Identifier: BSD-3-Clause

//! Embedded processing configuration.
//!
//! The replacement mapping and the digit-correction constants are tied to one
//! specific batch of Romanian company registry documents. They are kept as
//! `Default` impls rather than hard-coded call sites so a caller can supply
//! its own mapping, but there is deliberately no configuration file.

/// Prefix prepended to every output filename.
pub const OUTPUT_PREFIX: &str = "WORKING_";

/// Name of the output subfolder created inside the input folder when no
/// explicit output folder is given.
pub const DEFAULT_OUTPUT_SUBDIR: &str = "Modified";

/// Correction of an identifier rendered as individual digit glyphs next to a
/// label. This is a positional heuristic for one known form layout: it trusts
/// geometric adjacency to the anchor text, not any semantic association.
#[derive(Debug, Clone)]
pub struct DigitRestampConfig {
    /// Full label that must appear somewhere on the page for the pass to run.
    pub label: String,
    /// Anchor text whose bounding box the digit glyphs are measured against.
    pub anchor: String,
    /// Replacement digits, stamped in reading order over the first
    /// `sequence.len()` qualifying glyphs.
    pub sequence: String,
    /// Maximum vertical distance (user-space units) between a digit glyph and
    /// the anchor line.
    pub vertical_tolerance: f32,
}

impl Default for DigitRestampConfig {
    fn default() -> Self {
        Self {
            label: "Cod unic de inregistrare".to_string(),
            anchor: "Cod unic".to_string(),
            sequence: "34353611".to_string(),
            vertical_tolerance: 30.0,
        }
    }
}

/// Full processing configuration: the ordered replacement mapping plus the
/// digit-correction heuristic.
#[derive(Debug, Clone)]
pub struct RestampConfig {
    /// `(search, replacement)` pairs, applied independently in order, one
    /// pass per pair per page or stream. Literal matching only.
    pub replacements: Vec<(String, String)>,
    pub digits: DigitRestampConfig,
}

impl Default for RestampConfig {
    fn default() -> Self {
        let replacements = [
            ("SC TIP B SRL", "SC IOANA SRL"),
            ("Tip B SRL", "Ioana SRL"),
            ("TIP B SRL", "IOANA SRL"),
            ("J/22/1740/2007", "J22/1234/2025"),
            ("886577611", "34353611"),
            ("21920509", "21920508"),
            ("FANTANARU NECULAI", "IONUT GHINDA"),
            ("CONSTANTINESCU DANA", "GHIA LORYDANA"),
            ("Doina-Daniela", "Doina-Lorydana"),
            ("Daniela Constantinescu", "Ghia-Lorydana"),
        ]
        .iter()
        .map(|(s, r)| (s.to_string(), r.to_string()))
        .collect();

        Self {
            replacements,
            digits: DigitRestampConfig::default(),
        }
    }
}
