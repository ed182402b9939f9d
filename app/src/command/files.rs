use std::sync::Arc;
use voterroll_store::RecordStore;

use super::Output;

/// Strategy for listing stored file names.
#[derive(Debug, Clone, Copy)]
pub struct FilesStrategy;

impl super::CommandStrategy for FilesStrategy {
    type Input = (Arc<RecordStore>, Output);

    async fn execute(&self, (store, output): Self::Input) -> anyhow::Result<()> {
        let names = store.list_file_names().await?;
        output.emit(&names, || {
            if names.is_empty() {
                println!("No files stored");
            }
            for name in &names {
                println!("{name}");
            }
        })
    }
}

/// Strategy for deleting every record of one stored file.
#[derive(Debug, Clone, Copy)]
pub struct DeleteFileStrategy;

impl super::CommandStrategy for DeleteFileStrategy {
    type Input = (Arc<RecordStore>, String);

    async fn execute(&self, (store, file): Self::Input) -> anyhow::Result<()> {
        let removed = store.delete_file_data(&file).await?;
        println!("Deleted {removed} records from {file}");
        Ok(())
    }
}
