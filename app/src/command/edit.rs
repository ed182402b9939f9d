//! Commands that change or remove stored records.

use std::sync::Arc;
use voterroll_core::RecordFields;
use voterroll_store::RecordStore;

pub struct UpdateInput {
    pub store: Arc<RecordStore>,
    pub id: i32,
    /// Fields to overwrite; absent fields stay as they are
    pub patch: RecordFields,
}

#[derive(Debug, Clone, Copy)]
pub struct UpdateStrategy;

impl super::CommandStrategy for UpdateStrategy {
    type Input = UpdateInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        if input.patch.is_empty() {
            anyhow::bail!("Nothing to update; pass at least one field");
        }
        if !input.store.update_record(input.id, &input.patch).await? {
            anyhow::bail!("Record {} not found", input.id);
        }
        println!("Updated record {}", input.id);
        Ok(())
    }
}

pub struct DeleteInput {
    pub store: Arc<RecordStore>,
    pub id: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteStrategy;

impl super::CommandStrategy for DeleteStrategy {
    type Input = DeleteInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        if !input.store.delete_record(input.id).await? {
            anyhow::bail!("Record {} not found", input.id);
        }
        println!("Deleted record {}", input.id);
        Ok(())
    }
}

/// Strategy for wiping every record and tag.
#[derive(Debug, Clone, Copy)]
pub struct ClearStrategy;

impl super::CommandStrategy for ClearStrategy {
    type Input = Arc<RecordStore>;

    async fn execute(&self, store: Self::Input) -> anyhow::Result<()> {
        let removed = store.delete_all_records().await?;
        println!("Deleted {removed} records");
        Ok(())
    }
}
