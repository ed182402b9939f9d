//! Field-wise substring search criteria.

use std::collections::BTreeMap;

use crate::fields::{Field, RecordFields};

/// Case-insensitive substring criteria, ANDed across fields.
///
/// Blank values are dropped on insertion, so "no criteria" and
/// "all criteria empty" behave the same.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    terms: BTreeMap<Field, String>,
}

impl SearchCriteria {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, field: Field, value: impl AsRef<str>) -> Self {
        self.insert(field, value);
        self
    }

    /// Add or replace the criterion for `field`.
    ///
    /// A blank value removes the criterion; any other value is kept as given,
    /// surrounding spaces included.
    pub fn insert(&mut self, field: Field, value: impl AsRef<str>) {
        let value = value.as_ref();
        if value.trim().is_empty() {
            self.terms.remove(&field);
        } else {
            self.terms.insert(field, value.to_lowercase());
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[must_use]
    pub fn matches(&self, fields: &RecordFields) -> bool {
        self.terms.iter().all(|(field, needle)| {
            fields
                .get(*field)
                .is_some_and(|value| value.to_lowercase().contains(needle.as_str()))
        })
    }
}

impl<S: AsRef<str>> FromIterator<(Field, S)> for SearchCriteria {
    fn from_iter<I: IntoIterator<Item = (Field, S)>>(iter: I) -> Self {
        let mut criteria = Self::new();
        for (field, value) in iter {
            criteria.insert(field, value);
        }
        criteria
    }
}
