//! Entry splitting.
//!
//! Voter rolls number every entry (`১.`, `০০২.`, `17.`) at the start of a
//! line; those markers are the only boundaries used.

use regex::Regex;
use std::sync::OnceLock;

/// Line start, optional indentation, Bengali or ASCII digits, then a period.
static BOUNDARY_PATTERN: OnceLock<Regex> = OnceLock::new();

#[expect(
    clippy::expect_used,
    reason = "Static regex pattern validated at compile time"
)]
fn boundary_pattern() -> &'static Regex {
    BOUNDARY_PATTERN.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*([০-৯0-9]+)\.")
            .expect("Static regex pattern is guaranteed to be valid")
    })
}

/// One entry's slice of the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// Numeral run of the entry marker, without the period. `None` for text
    /// preceding the first marker.
    pub serial: Option<&'a str>,
    /// Full entry text, marker included.
    pub text: &'a str,
}

/// Split `text` into entry segments in source order.
///
/// Whitespace-only segments are discarded.
#[must_use]
pub fn split_entries(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut serial = None;

    for caps in boundary_pattern().captures_iter(text) {
        let (Some(marker), Some(digits)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        push_segment(&mut segments, serial, &text[start..marker.start()]);
        start = marker.start();
        serial = Some(digits.as_str());
    }
    push_segment(&mut segments, serial, &text[start..]);

    segments
}

fn push_segment<'a>(segments: &mut Vec<Segment<'a>>, serial: Option<&'a str>, text: &'a str) {
    if !text.trim().is_empty() {
        segments.push(Segment { serial, text });
    }
}
