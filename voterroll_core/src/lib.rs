#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

pub mod criteria;
pub mod extraction;
pub mod fields;
pub mod record;
pub mod settings;

pub use criteria::SearchCriteria;
pub use extraction::{
    ExtractError, ExtractionConfig, ExtractionEngine, ValidationPolicy, decode_document,
};
pub use fields::{Field, RecordFields};
pub use record::{OccupationStat, Page, Provenance, Record, RelationKind, RelationTag};
pub use settings::{RetryPolicy, StoreSettings};

/// Folder value that callers use to mean "every folder".
pub const ALL_FOLDERS: &str = "all";

/// Normalize an optional folder filter: absent, blank and [`ALL_FOLDERS`]
/// all mean no restriction.
#[must_use]
pub fn folder_filter(folder: Option<&str>) -> Option<&str> {
    folder
        .map(str::trim)
        .filter(|f| !f.is_empty() && *f != ALL_FOLDERS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_filter() {
        assert_eq!(folder_filter(None), None);
        assert_eq!(folder_filter(Some("")), None);
        assert_eq!(folder_filter(Some("all")), None);
        assert_eq!(folder_filter(Some(" ward-3 ")), Some("ward-3"));
    }
}
