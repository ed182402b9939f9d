//! Record store: durable storage, search, pagination and statistics for
//! extracted voter-roll records.

use chrono::Utc;
use rayon::prelude::*;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use std::collections::HashMap;
use std::future::Future;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use voterroll_core::{
    OccupationStat, Page, Provenance, Record, RecordFields, SearchCriteria, StoreSettings,
    folder_filter,
};
use voterroll_entities::{records, relations};

use crate::cache::FileNameCache;
use crate::convert;
use crate::error::{Result, StoreError};
use crate::retry;
use crate::schema;

/// Persistent store for extracted records and their relation tags.
///
/// Construct one per process with [`RecordStore::open`] and pass it to
/// callers; shut it down with [`RecordStore::close`]. Every operation runs
/// through the retry layer, which reconnects on transient failures.
pub struct RecordStore {
    /// Live connection; swapped out on reconnect
    db: RwLock<DatabaseConnection>,
    /// Options used for the initial connection and every reconnect
    options: ConnectOptions,
    settings: StoreSettings,
    file_names: FileNameCache,
}

impl RecordStore {
    /// Connect to the database at `database_url` and make sure the schema
    /// exists.
    ///
    /// # Errors
    /// Returns [`StoreError::Config`] for an empty URL, or the connection
    /// error once the retry ceiling is reached.
    pub async fn open(database_url: &str, settings: StoreSettings) -> Result<Self> {
        if database_url.trim().is_empty() {
            return Err(StoreError::Config("database URL is empty".to_string()));
        }
        let mut options = ConnectOptions::new(database_url);
        options.sqlx_logging(false);
        Self::connect(options, settings).await
    }

    /// Connect with explicit connection options.
    pub async fn connect(options: ConnectOptions, settings: StoreSettings) -> Result<Self> {
        info!("Connecting to database for RecordStore");
        let connect_options = &options;
        let db = retry::retry_with_backoff(
            &settings.retry,
            move || async move {
                let db = Database::connect(connect_options.clone()).await?;
                schema::ensure_schema(&db).await?;
                Ok::<_, StoreError>(db)
            },
            || async {},
        )
        .await?;
        info!("RecordStore initialized");

        Ok(Self {
            db: RwLock::new(db),
            file_names: FileNameCache::new(settings.file_list_ttl()),
            options,
            settings,
        })
    }

    /// Close the underlying connection pool.
    pub async fn close(self) -> Result<()> {
        info!("Closing RecordStore");
        self.db.into_inner().close().await?;
        Ok(())
    }

    #[must_use]
    pub const fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// Check that the database answers.
    pub async fn ping(&self) -> Result<()> {
        self.run(|db| async move { db.ping().await }).await
    }

    /// Run one storage operation under the retry policy.
    ///
    /// `operation` is invoked once per attempt with the current connection,
    /// so it must be safe to repeat.
    pub(crate) async fn run<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn(DatabaseConnection) -> Fut,
        Fut: Future<Output = std::result::Result<T, DbErr>>,
    {
        let operation = &operation;
        retry::retry_with_backoff(
            &self.settings.retry,
            move || async move {
                let db = self.connection().await;
                operation(db).await.map_err(StoreError::from)
            },
            move || self.reconnect(),
        )
        .await
    }

    async fn connection(&self) -> DatabaseConnection {
        self.db.read().await.clone()
    }

    /// Replace the live connection with a fresh one and close the old one.
    async fn reconnect(&self) {
        info!("Re-establishing database connection");
        let fresh = match Database::connect(self.options.clone()).await {
            Ok(db) => db,
            Err(e) => {
                warn!("Reconnect failed: {e}");
                return;
            }
        };
        if let Err(e) = schema::ensure_schema(&fresh).await {
            warn!("Schema check after reconnect failed: {e}");
        }

        let stale = std::mem::replace(&mut *self.db.write().await, fresh);
        if let Err(e) = stale.close().await {
            debug!("Closing stale connection failed: {e}");
        }
    }

    /// Append `records` under the given provenance.
    ///
    /// Records are written in transactions of `batch_size`. If a batch fails
    /// it is rolled back and the error returned; batches committed before it
    /// stay in place.
    ///
    /// # Returns
    /// Number of records inserted
    #[tracing::instrument(skip(self, records), fields(count = records.len()))]
    pub async fn add_records(
        &self,
        file_name: &str,
        batch_name: Option<&str>,
        records: &[RecordFields],
    ) -> Result<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        let provenance = Provenance::new(file_name, batch_name);
        let key = provenance.key();
        let uploaded_at = Utc::now();
        let batch_size = self.settings.batch_size.max(1);
        let mut inserted = 0_u64;

        for (index, chunk) in records.chunks(batch_size).enumerate() {
            let models: Vec<records::ActiveModel> = chunk
                .iter()
                .map(|fields| convert::new_record_model(fields, &key, uploaded_at))
                .collect();

            let result = self
                .run(|db| {
                    let models = models.clone();
                    async move {
                        let txn = db.begin().await?;
                        records::Entity::insert_many(models).exec(&txn).await?;
                        txn.commit().await
                    }
                })
                .await;

            // Any earlier batch changed the file list even if this one failed.
            if let Err(e) = result {
                self.file_names.invalidate().await;
                warn!(
                    "Batch {} of {} failed after {} records were stored: {e}",
                    index + 1,
                    key,
                    inserted
                );
                return Err(e);
            }
            inserted += chunk.len() as u64;
            debug!("Stored batch {} ({} records) for {}", index + 1, chunk.len(), key);
        }

        self.file_names.invalidate().await;
        info!("Stored {} records for {}", inserted, key);
        Ok(inserted)
    }

    /// One page of the records stored under `file_name` (a provenance key),
    /// ordered by id. `page` is 1-based; page 0 is read as page 1.
    pub async fn get_records(
        &self,
        file_name: &str,
        page: u64,
        page_size: u64,
    ) -> Result<Page<Record>> {
        let page = page.max(1);
        let page_size = page_size.max(1);

        let (models, totals) = self
            .run(|db| async move {
                let paginator = records::Entity::find()
                    .filter(records::Column::FileName.eq(file_name))
                    .order_by_asc(records::Column::Id)
                    .paginate(&db, page_size);
                let totals = paginator.num_items_and_pages().await?;
                let models = paginator.fetch_page(page - 1).await?;
                Ok((models, totals))
            })
            .await?;

        Ok(Page {
            items: models.into_iter().map(convert::record_from_model).collect(),
            total: totals.number_of_items,
            pages: totals.number_of_pages,
            page,
            page_size,
        })
    }

    pub async fn get_record(&self, id: i32) -> Result<Option<Record>> {
        let model = self
            .run(|db| async move { records::Entity::find_by_id(id).one(&db).await })
            .await?;
        Ok(model.map(convert::record_from_model))
    }

    /// Every stored record across all provenances, ordered by id.
    pub async fn get_all_records(&self) -> Result<Vec<Record>> {
        let models = self
            .run(|db| async move {
                records::Entity::find()
                    .order_by_asc(records::Column::Id)
                    .all(&db)
                    .await
            })
            .await?;
        Ok(models.into_iter().map(convert::record_from_model).collect())
    }

    pub async fn count_records(&self) -> Result<u64> {
        self.run(|db| async move { records::Entity::find().count(&db).await })
            .await
    }

    /// Distinct provenance keys, sorted.
    pub async fn list_file_names(&self) -> Result<Vec<String>> {
        if let Some(names) = self.file_names.get().await {
            debug!("File name cache hit ({} names)", names.len());
            return Ok(names);
        }

        let generation = self.file_names.generation().await;
        let mut names = self
            .run(|db| async move {
                records::Entity::find()
                    .select_only()
                    .column(records::Column::FileName)
                    .distinct()
                    .into_tuple::<String>()
                    .all(&db)
                    .await
            })
            .await?;
        names.sort();

        self.file_names.put(generation, names.clone()).await;
        Ok(names)
    }

    /// Records whose fields contain every criterion, case-insensitively.
    ///
    /// Filtering happens in memory after a full scan, so case folding is the
    /// same on every backend.
    pub async fn search_records(&self, criteria: &SearchCriteria) -> Result<Vec<Record>> {
        let records = self.get_all_records().await?;
        if criteria.is_empty() {
            return Ok(records);
        }

        let matches: Vec<Record> = records
            .into_par_iter()
            .filter(|record| criteria.matches(&record.fields))
            .collect();
        debug!("Search matched {} records", matches.len());
        Ok(matches)
    }

    /// Occupation counts for one folder, or for everything when `folder` is
    /// absent, blank or `"all"`. Sorted by descending count, then occupation.
    pub async fn get_occupation_stats(
        &self,
        folder: Option<&str>,
    ) -> Result<Vec<OccupationStat>> {
        let folder = folder_filter(folder);

        let rows = self
            .run(|db| async move {
                records::Entity::find()
                    .select_only()
                    .column(records::Column::FileName)
                    .column(records::Column::Occupation)
                    .filter(records::Column::Occupation.is_not_null())
                    .into_tuple::<(String, Option<String>)>()
                    .all(&db)
                    .await
            })
            .await?;

        let mut counts: HashMap<String, u64> = HashMap::new();
        for (file_name, occupation) in rows {
            let Some(occupation) = occupation.filter(|o| !o.trim().is_empty()) else {
                continue;
            };
            if folder.is_some() && Provenance::parse(&file_name).folder() != folder {
                continue;
            }
            *counts.entry(occupation).or_default() += 1;
        }

        let mut stats: Vec<OccupationStat> = counts
            .into_iter()
            .map(|(occupation, count)| OccupationStat { occupation, count })
            .collect();
        stats.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.occupation.cmp(&b.occupation))
        });
        Ok(stats)
    }

    /// Overwrite the fields set in `patch` on record `id`.
    ///
    /// Provenance cannot be changed. Tags keep the snapshot taken when they
    /// were assigned.
    ///
    /// # Returns
    /// `false` if no record has that id
    pub async fn update_record(&self, id: i32, patch: &RecordFields) -> Result<bool> {
        let updated = self
            .run(|db| async move {
                let Some(model) = records::Entity::find_by_id(id).one(&db).await? else {
                    return Ok(false);
                };
                if patch.is_empty() {
                    return Ok(true);
                }

                let mut active: records::ActiveModel = model.into();
                for (field, value) in patch.present() {
                    convert::set_field(&mut active, field, value);
                }
                active.update(&db).await?;
                Ok(true)
            })
            .await?;

        if updated {
            self.file_names.invalidate().await;
            info!("Updated record {id}");
        }
        Ok(updated)
    }

    /// Delete record `id` together with its relation tag.
    ///
    /// # Returns
    /// `false` if no record has that id
    pub async fn delete_record(&self, id: i32) -> Result<bool> {
        let deleted = self
            .run(|db| async move {
                let txn = db.begin().await?;
                relations::Entity::delete_many()
                    .filter(relations::Column::RecordId.eq(id))
                    .exec(&txn)
                    .await?;
                let result = records::Entity::delete_by_id(id).exec(&txn).await?;
                txn.commit().await?;
                Ok(result.rows_affected > 0)
            })
            .await?;

        if deleted {
            self.file_names.invalidate().await;
            info!("Deleted record {id}");
        }
        Ok(deleted)
    }

    /// Delete every record stored under `file_name` and their tags.
    ///
    /// # Returns
    /// Number of records removed
    pub async fn delete_file_data(&self, file_name: &str) -> Result<u64> {
        let removed = self
            .run(|db| async move {
                let txn = db.begin().await?;
                // Tags copy the record's provenance, which never changes.
                relations::Entity::delete_many()
                    .filter(relations::Column::FileName.eq(file_name))
                    .exec(&txn)
                    .await?;
                let result = records::Entity::delete_many()
                    .filter(records::Column::FileName.eq(file_name))
                    .exec(&txn)
                    .await?;
                txn.commit().await?;
                Ok(result.rows_affected)
            })
            .await?;

        self.file_names.invalidate().await;
        info!("Deleted {} records for {}", removed, file_name);
        Ok(removed)
    }

    /// Delete all tags, then all records.
    ///
    /// # Returns
    /// Number of records removed
    pub async fn delete_all_records(&self) -> Result<u64> {
        let removed = self
            .run(|db| async move {
                let txn = db.begin().await?;
                relations::Entity::delete_many().exec(&txn).await?;
                let result = records::Entity::delete_many().exec(&txn).await?;
                txn.commit().await?;
                Ok(result.rows_affected)
            })
            .await?;

        self.file_names.invalidate().await;
        info!("Deleted all {} records", removed);
        Ok(removed)
    }
}
