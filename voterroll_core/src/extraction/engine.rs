//! Extraction engine for voter-roll records.
//!
//! The engine splits a document into numbered entries and applies the
//! compiled field patterns to each entry, yielding one [`RecordFields`] per
//! accepted entry in source order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::patterns::{FieldPattern, PatternDef, default_patterns};
use super::splitter::{Segment, split_entries};
use super::{ExtractError, decode_document};
use crate::fields::{Field, RecordFields};

/// Which entries are kept after extraction.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Keep any entry with at least one extracted field.
    #[default]
    Lenient,
    /// Also require serial number, name and voter number.
    Strict,
}

impl ValidationPolicy {
    const STRICT_REQUIRED: [Field; 3] = [Field::SerialNumber, Field::Name, Field::VoterNumber];

    /// Required fields missing from `fields`, empty when the entry is kept.
    fn missing(self, fields: &RecordFields) -> Vec<Field> {
        match self {
            Self::Lenient => Vec::new(),
            Self::Strict => Self::STRICT_REQUIRED
                .into_iter()
                .filter(|f| fields.get(*f).is_none())
                .collect(),
        }
    }
}

/// Configuration for the extraction engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Field patterns to apply.
    #[serde(default = "default_patterns")]
    pub patterns: Vec<PatternDef>,

    #[serde(default)]
    pub policy: ValidationPolicy,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
            policy: ValidationPolicy::default(),
        }
    }
}

/// Turns voter-roll text into structured field sets.
#[derive(Debug, Clone)]
pub struct ExtractionEngine {
    /// Compiled field patterns.
    patterns: Vec<FieldPattern>,
    policy: ValidationPolicy,
}

impl ExtractionEngine {
    /// Create a new extraction engine from configuration.
    ///
    /// # Errors
    /// Returns an error if a pattern does not compile.
    pub fn new(config: &ExtractionConfig) -> Result<Self, ExtractError> {
        let patterns = config
            .patterns
            .iter()
            .map(PatternDef::build)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            patterns,
            policy: config.policy,
        })
    }

    /// Create an extraction engine with the default patterns and policy.
    pub fn with_defaults() -> Result<Self, ExtractError> {
        Self::new(&ExtractionConfig::default())
    }

    #[must_use]
    pub const fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    /// Extract every entry from already-normalized text.
    ///
    /// Malformed entries are logged and skipped; this never fails.
    #[must_use]
    pub fn extract(&self, text: &str) -> Vec<RecordFields> {
        let segments = split_entries(text);
        let total = segments.len();

        let records: Vec<RecordFields> = segments
            .into_par_iter()
            .enumerate()
            .filter_map(|(index, segment)| self.extract_segment(index, segment))
            .collect();

        debug!(
            "Extracted {} of {} entries (policy={:?})",
            records.len(),
            total,
            self.policy
        );
        records
    }

    /// Decode raw document bytes and extract every entry.
    ///
    /// # Errors
    /// Returns [`ExtractError::Decode`] if the bytes are not valid UTF-8.
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<Vec<RecordFields>, ExtractError> {
        let text = decode_document(bytes)?;
        Ok(self.extract(&text))
    }

    fn extract_segment(&self, index: usize, segment: Segment<'_>) -> Option<RecordFields> {
        let mut fields = RecordFields::default();
        if let Some(serial) = segment.serial {
            fields.set(Field::SerialNumber, serial);
        }
        for pattern in &self.patterns {
            if let Some(value) = pattern.capture(segment.text) {
                fields.set(pattern.field, value);
            }
        }

        if fields.is_empty() {
            debug!("Skipping entry {index}: no fields found");
            return None;
        }

        let missing = self.policy.missing(&fields);
        if !missing.is_empty() {
            warn!(
                "Dropping entry {} (serial={}): missing {:?}",
                index,
                segment.serial.unwrap_or("-"),
                missing
            );
            return None;
        }

        Some(fields)
    }
}
