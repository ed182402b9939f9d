use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::RecordFields;

/// Where a record came from: an optional batch folder plus the source file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Provenance {
    pub batch_name: Option<String>,
    pub file_name: String,
}

impl Provenance {
    #[must_use]
    pub fn new(file_name: impl Into<String>, batch_name: Option<&str>) -> Self {
        Self {
            batch_name: batch_name
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(str::to_string),
            file_name: file_name.into(),
        }
    }

    /// Split a stored provenance key back into batch and file.
    #[must_use]
    pub fn parse(key: &str) -> Self {
        match key.split_once('/') {
            Some((batch, file)) if !batch.is_empty() => Self {
                batch_name: Some(batch.to_string()),
                file_name: file.to_string(),
            },
            _ => Self {
                batch_name: None,
                file_name: key.to_string(),
            },
        }
    }

    /// The single string persisted for this provenance: `batch/file` or `file`.
    #[must_use]
    pub fn key(&self) -> String {
        self.batch_name.as_ref().map_or_else(
            || self.file_name.clone(),
            |batch| format!("{batch}/{}", self.file_name),
        )
    }

    #[must_use]
    pub fn folder(&self) -> Option<&str> {
        self.batch_name.as_deref()
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    pub id: i32,
    #[serde(flatten)]
    pub fields: RecordFields,
    pub provenance: Provenance,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    None,
    Friend,
    Enemy,
}

impl RelationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Friend => "friend",
            Self::Enemy => "enemy",
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RelationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "friend" => Ok(Self::Friend),
            "enemy" => Ok(Self::Enemy),
            other => Err(format!("unknown relation kind: {other}")),
        }
    }
}

/// Classification of a record, carrying a snapshot of the record's fields
/// taken when the tag was assigned.
///
/// The snapshot is not refreshed by later record updates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelationTag {
    pub id: i32,
    pub record_id: i32,
    pub kind: RelationKind,
    #[serde(flatten)]
    pub fields: RecordFields,
    pub file_name: String,
    pub folder: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One page of a paginated listing. Pages are 1-based.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub pages: u64,
    pub page: u64,
    pub page_size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OccupationStat {
    pub occupation: String,
    pub count: u64,
}
