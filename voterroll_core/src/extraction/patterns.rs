//! Labelled-value patterns, one per extracted field.
//!
//! A pattern is defined by its label alternation only; the surrounding
//! `Label: value` shape is shared by every field. Definitions are serde types
//! so a deployment can replace the labels through configuration.

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ExtractError;
use crate::fields::Field;

/// Definition of a single field pattern.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatternDef {
    /// Field the captured value is stored under.
    pub field: Field,

    /// Regex alternation of the labels that introduce the value.
    ///
    /// Longer labels must come first when one label is a prefix of another
    /// (`পিতার\s*নাম|পিতা`), since the first matching alternative wins.
    pub label: String,
}

impl PatternDef {
    #[must_use]
    pub fn new(field: Field, label: &str) -> Self {
        Self {
            field,
            label: label.to_string(),
        }
    }

    /// Compile into a [`FieldPattern`].
    ///
    /// The label must open a clause (line start, or after `,` `;` `.` `।`),
    /// matching is case-insensitive, and the colon after the label is
    /// optional. The value starts at the first non-blank character and runs
    /// to the next comma, newline or danda, or to a period that ends a clause
    /// (followed by whitespace or the end of text). Periods inside a value,
    /// as in `০১.০২.১৯৮০`, are kept.
    pub fn build(&self) -> Result<FieldPattern, ExtractError> {
        let source = format!(
            r"(?im)(?:^|[,;.।])[ \t]*(?:{})[ \t]*[:：]?[ \t]*([^\s,।:：.](?:[^,\n।.]|\.[^\s,।.])*)",
            self.label
        );
        let regex = Regex::new(&source).map_err(|source| ExtractError::Pattern {
            field: self.field,
            source,
        })?;
        Ok(FieldPattern {
            field: self.field,
            regex,
        })
    }
}

/// A compiled field pattern.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    pub field: Field,
    regex: Regex,
}

impl FieldPattern {
    /// First non-blank value for this field in `segment`, trimmed.
    #[must_use]
    pub fn capture(&self, segment: &str) -> Option<String> {
        self.regex
            .captures_iter(segment)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .find(|value| !value.is_empty())
            .map(str::to_string)
    }
}

/// Default pattern set: Bengali labels as printed on voter rolls, plus the
/// Latin labels seen in transliterated exports.
///
/// The serial number has no pattern here; it comes from the entry boundary.
#[must_use]
pub fn default_patterns() -> Vec<PatternDef> {
    vec![
        PatternDef::new(Field::Name, r"নাম|name"),
        PatternDef::new(
            Field::VoterNumber,
            r"ভোটার\s*(?:নং|নম্বর)|voter\s*(?:no\.?|number|id)",
        ),
        PatternDef::new(
            Field::FatherName,
            r"পিতার\s*নাম|পিতা|father(?:'s)?\s*name|father",
        ),
        PatternDef::new(
            Field::MotherName,
            r"মাতার\s*নাম|মাতা|mother(?:'s)?\s*name|mother",
        ),
        PatternDef::new(Field::Occupation, r"পেশা|occupation|profession"),
        PatternDef::new(
            Field::DateOfBirth,
            r"জন্ম\s*তারিখ|date\s*of\s*birth|birth\s*date|dob",
        ),
        PatternDef::new(Field::Address, r"ঠিকানা|address"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(field: Field) -> FieldPattern {
        default_patterns()
            .into_iter()
            .find(|def| def.field == field)
            .and_then(|def| def.build().ok())
            .unwrap_or_else(|| panic!("no default pattern for {field}"))
    }

    #[test]
    fn test_default_patterns_build() {
        for def in default_patterns() {
            assert!(def.build().is_ok(), "pattern for {} should build", def.field);
        }
    }

    #[test]
    fn test_capture_stops_at_separators() {
        let name = pattern(Field::Name);
        assert_eq!(name.capture("নাম: করিম, পিতা: রহিম").as_deref(), Some("করিম"));
        assert_eq!(name.capture("নাম: করিম\nপিতা: রহিম").as_deref(), Some("করিম"));
        assert_eq!(name.capture("নাম: করিম। পিতা: রহিম").as_deref(), Some("করিম"));
    }

    #[test]
    fn test_colon_and_case_are_optional() {
        let name = pattern(Field::Name);
        assert_eq!(name.capture("নাম করিম").as_deref(), Some("করিম"));
        assert_eq!(name.capture("NAME: Karim").as_deref(), Some("Karim"));

        let voter = pattern(Field::VoterNumber);
        assert_eq!(voter.capture("ভোটার নং ১২৩৪").as_deref(), Some("১২৩৪"));
        assert_eq!(voter.capture("Voter No. 0042").as_deref(), Some("0042"));
    }

    #[test]
    fn test_clause_ending_period_ends_value() {
        let name = pattern(Field::Name);
        let father = pattern(Field::FatherName);
        let text = "১. Name: Karim. Father: Rahim";
        assert_eq!(name.capture(text).as_deref(), Some("Karim"));
        assert_eq!(father.capture(text).as_deref(), Some("Rahim"));

        assert_eq!(name.capture("Name: Karim.").as_deref(), Some("Karim"));
        assert_eq!(name.capture("Name: Karim.\nFather: Rahim").as_deref(), Some("Karim"));
    }

    #[test]
    fn test_inner_periods_are_kept() {
        let dob = pattern(Field::DateOfBirth);
        assert_eq!(
            dob.capture("জন্ম তারিখ: ০১.০২.১৯৮০, পেশা: কৃষক").as_deref(),
            Some("০১.০২.১৯৮০")
        );
        assert_eq!(dob.capture("DOB: 01.02.1980.").as_deref(), Some("01.02.1980"));
    }

    #[test]
    fn test_label_must_open_a_clause() {
        let name = pattern(Field::Name);
        // "নাম" inside "পিতার নাম" belongs to the father field
        assert_eq!(name.capture("পিতার নাম: রহিম"), None);

        let father = pattern(Field::FatherName);
        assert_eq!(father.capture("পিতার নাম: রহিম").as_deref(), Some("রহিম"));
        assert_eq!(father.capture("১. পিতা: রহিম").as_deref(), Some("রহিম"));
    }

    #[test]
    fn test_blank_value_is_absent() {
        let address = pattern(Field::Address);
        assert_eq!(address.capture("ঠিকানা:   \nপেশা: কৃষক"), None);
        assert_eq!(address.capture("ঠিকানা:, পেশা: কৃষক"), None);
    }

    #[test]
    fn test_invalid_label_reports_field() {
        let def = PatternDef::new(Field::Address, "(unclosed");
        let err = def.build().err();
        assert!(matches!(
            err,
            Some(ExtractError::Pattern {
                field: Field::Address,
                ..
            })
        ));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_pattern_def_serialization() {
        let def = PatternDef::new(Field::Occupation, "পেশা");
        let json = serde_json::to_string(&def).expect("pattern should serialize");
        assert_eq!(json, r#"{"field":"occupation","label":"পেশা"}"#);

        let back: PatternDef = serde_json::from_str(&json).expect("valid JSON should deserialize");
        assert_eq!(back, def);
    }
}
