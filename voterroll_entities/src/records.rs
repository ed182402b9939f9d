//! Extracted voter-roll record.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub serial_number: Option<String>,
    pub name: Option<String>,
    pub voter_number: Option<String>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub occupation: Option<String>,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    /// Provenance key: `batch/file` or bare `file`. Never updated.
    pub file_name: String,
    pub uploaded_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::relations::Entity")]
    RelationTag,
}

impl Related<super::relations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RelationTag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
