//! Friend/enemy tag attached to a record.
//!
//! Field columns are a snapshot of the record at tagging time so listings
//! need no join.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "relations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub record_id: i32,
    /// `friend` or `enemy`
    pub relation_type: String,
    pub serial_number: Option<String>,
    pub name: Option<String>,
    pub voter_number: Option<String>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub occupation: Option<String>,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub file_name: String,
    /// First path segment of `file_name`, if it has one.
    pub folder: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::records::Entity",
        from = "Column::RecordId",
        to = "super::records::Column::Id",
        on_delete = "Cascade"
    )]
    Record,
}

impl Related<super::records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Record.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
