// SPDX-FileCopyrightText: 2025 RustInFinance
// SPDX-License-Identifier: BSD-3-Clause

//! Batch redact-and-restamp for PDF documents.
//!
//! Replaces a fixed set of literal strings inside PDFs while preserving the
//! page layout. Plain text-layer documents get positional redaction: matched
//! glyphs are blanked, painted over in white and the replacement is stamped
//! at the same spot. XFA form documents instead get their XML packet streams
//! rewritten. Documents the primary parser cannot open are validated with a
//! second parser and copied through unchanged.

pub mod batch;
pub mod config;
pub mod dispatch;
pub mod error;

mod digits;
mod fallback;
mod layout;
mod redact;
mod search;
mod stamp;
mod xfa;

#[cfg(test)]
pub(crate) mod testutil;

pub use batch::{process_directory, BatchReport};
pub use config::{DigitRestampConfig, RestampConfig, DEFAULT_OUTPUT_SUBDIR, OUTPUT_PREFIX};
pub use dispatch::{process_file, ProcessOutcome, Strategy};
pub use error::{Error, Result};
