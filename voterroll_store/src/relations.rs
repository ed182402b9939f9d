//! Relation sub-store: friend/enemy tags on records.

use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, TransactionTrait};
use tracing::{debug, info};
use voterroll_core::{RelationKind, RelationTag, folder_filter};
use voterroll_entities::{records, relations};

use crate::convert;
use crate::error::Result;
use crate::store::RecordStore;

enum MarkOutcome {
    MissingRecord,
    Unchanged,
    Replaced,
}

impl RecordStore {
    /// Tag record `id` as `kind`, replacing any earlier tag.
    ///
    /// The tag stores a snapshot of the record's current fields and folder.
    /// Tagging with the kind the record already has is a no-op, and
    /// [`RelationKind::None`] removes the tag.
    ///
    /// # Returns
    /// `false` if no record has that id
    pub async fn mark_relation(&self, id: i32, kind: RelationKind) -> Result<bool> {
        let created_at = Utc::now();

        let outcome = self
            .run(|db| async move {
                let Some(record) = records::Entity::find_by_id(id).one(&db).await? else {
                    return Ok(MarkOutcome::MissingRecord);
                };
                let current = relations::Entity::find()
                    .filter(relations::Column::RecordId.eq(id))
                    .one(&db)
                    .await?;

                let current_kind = current.as_ref().map(|tag| tag.relation_type.as_str());
                let unchanged = match kind {
                    RelationKind::None => current_kind.is_none(),
                    _ => current_kind == Some(kind.as_str()),
                };
                if unchanged {
                    return Ok(MarkOutcome::Unchanged);
                }

                let txn = db.begin().await?;
                relations::Entity::delete_many()
                    .filter(relations::Column::RecordId.eq(id))
                    .exec(&txn)
                    .await?;
                if kind != RelationKind::None {
                    relations::Entity::insert(convert::new_tag_model(&record, kind, created_at))
                        .exec(&txn)
                        .await?;
                }
                txn.commit().await?;
                Ok(MarkOutcome::Replaced)
            })
            .await?;

        match outcome {
            MarkOutcome::MissingRecord => {
                debug!("Cannot tag record {id}: not found");
                Ok(false)
            }
            MarkOutcome::Unchanged => {
                debug!("Record {id} already tagged {kind}");
                Ok(true)
            }
            MarkOutcome::Replaced => {
                info!("Tagged record {id} as {kind}");
                Ok(true)
            }
        }
    }

    /// Current tag of record `id`, if it has one.
    pub async fn get_relation(&self, id: i32) -> Result<Option<RelationTag>> {
        let model = self
            .run(|db| async move {
                relations::Entity::find()
                    .filter(relations::Column::RecordId.eq(id))
                    .one(&db)
                    .await
            })
            .await?;
        Ok(model.map(convert::tag_from_model))
    }

    /// All tags of `kind`, optionally limited to one folder.
    ///
    /// Tags are returned as stored, without re-reading the records. No tag
    /// is ever stored for [`RelationKind::None`], so that kind lists nothing.
    pub async fn get_relations_by_type(
        &self,
        kind: RelationKind,
        folder: Option<&str>,
    ) -> Result<Vec<RelationTag>> {
        if kind == RelationKind::None {
            return Ok(Vec::new());
        }
        let folder = folder_filter(folder);

        let models = self
            .run(|db| async move {
                let mut query = relations::Entity::find()
                    .filter(relations::Column::RelationType.eq(kind.as_str()));
                if let Some(folder) = folder {
                    query = query.filter(relations::Column::Folder.eq(folder));
                }
                query
                    .order_by_asc(relations::Column::Id)
                    .all(&db)
                    .await
            })
            .await?;
        Ok(models.into_iter().map(convert::tag_from_model).collect())
    }
}
