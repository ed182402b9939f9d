//! Registry of the fields extracted from every voter-roll entry.
//!
//! Field access goes through [`Field`] so callers never resolve a field by
//! matching a free-form string against struct attributes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    SerialNumber,
    Name,
    VoterNumber,
    FatherName,
    MotherName,
    Occupation,
    DateOfBirth,
    Address,
}

impl Field {
    pub const ALL: [Self; 8] = [
        Self::SerialNumber,
        Self::Name,
        Self::VoterNumber,
        Self::FatherName,
        Self::MotherName,
        Self::Occupation,
        Self::DateOfBirth,
        Self::Address,
    ];

    /// Stable machine key, used in config files and the CLI.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::SerialNumber => "serial_number",
            Self::Name => "name",
            Self::VoterNumber => "voter_number",
            Self::FatherName => "father_name",
            Self::MotherName => "mother_name",
            Self::Occupation => "occupation",
            Self::DateOfBirth => "date_of_birth",
            Self::Address => "address",
        }
    }

    /// Label as printed in the source documents.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SerialNumber => "ক্রমিক নং",
            Self::Name => "নাম",
            Self::VoterNumber => "ভোটার নং",
            Self::FatherName => "পিতা",
            Self::MotherName => "মাতা",
            Self::Occupation => "পেশা",
            Self::DateOfBirth => "জন্ম তারিখ",
            Self::Address => "ঠিকানা",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Field {
    type Err = crate::ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|field| field.key() == key)
            .ok_or_else(|| crate::ExtractError::UnknownField(s.to_string()))
    }
}

/// One optional value per [`Field`].
///
/// This is both what the extractor produces for an entry and what the store
/// accepts as a write or update payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voter_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl RecordFields {
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    pub fn clear(&mut self, field: Field) {
        *self.slot_mut(field) = None;
    }

    /// Builder form of [`RecordFields::set`].
    #[must_use]
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| self.slot(*f).is_none())
    }

    /// Fields that carry a value, in registry order.
    pub fn present(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL
            .into_iter()
            .filter_map(|f| self.get(f).map(|v| (f, v)))
    }

    /// Overwrite every field that is set in `patch`, leaving the rest alone.
    pub fn apply(&mut self, patch: &Self) {
        for (field, value) in patch.present() {
            self.set(field, value);
        }
    }

    const fn slot(&self, field: Field) -> &Option<String> {
        match field {
            Field::SerialNumber => &self.serial_number,
            Field::Name => &self.name,
            Field::VoterNumber => &self.voter_number,
            Field::FatherName => &self.father_name,
            Field::MotherName => &self.mother_name,
            Field::Occupation => &self.occupation,
            Field::DateOfBirth => &self.date_of_birth,
            Field::Address => &self.address,
        }
    }

    const fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::SerialNumber => &mut self.serial_number,
            Field::Name => &mut self.name,
            Field::VoterNumber => &mut self.voter_number,
            Field::FatherName => &mut self.father_name,
            Field::MotherName => &mut self.mother_name,
            Field::Occupation => &mut self.occupation,
            Field::DateOfBirth => &mut self.date_of_birth,
            Field::Address => &mut self.address,
        }
    }
}
