//! Voter-roll record extraction.
//!
//! Raw text is split into numbered entries by [`splitter`], and each entry is
//! scanned with the labelled-value rules in [`patterns`]. [`engine`] ties the
//! two together and applies the validation policy.

pub mod engine;
pub mod patterns;
pub mod splitter;

pub use engine::{ExtractionConfig, ExtractionEngine, ValidationPolicy};
pub use patterns::{FieldPattern, PatternDef, default_patterns};
pub use splitter::{Segment, split_entries};

use thiserror::Error;

use crate::fields::Field;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("document is not valid UTF-8: {0}")]
    Decode(#[from] std::str::Utf8Error),

    #[error("invalid pattern for field {field}: {source}")]
    Pattern {
        field: Field,
        #[source]
        source: regex::Error,
    },

    #[error("unknown field: {0}")]
    UnknownField(String),
}

const BOM: char = '\u{feff}';

/// Decode raw document bytes into the canonical text form the extractor
/// expects: UTF-8, no byte-order mark, `\n` line endings.
pub fn decode_document(bytes: &[u8]) -> Result<String, ExtractError> {
    let text = std::str::from_utf8(bytes)?;
    Ok(normalize_text(text))
}

/// Strip a leading BOM and fold `\r\n` and lone `\r` into `\n`.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    text.strip_prefix(BOM)
        .unwrap_or(text)
        .replace("\r\n", "\n")
        .replace('\r', "\n")
}
