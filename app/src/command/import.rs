//! Import a voter-roll text file: decode, extract and store.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use voterroll_core::{ExtractionConfig, ExtractionEngine};
use voterroll_store::RecordStore;

/// Input parameters for the Import command strategy.
pub struct ImportInput {
    pub store: Arc<RecordStore>,
    pub extraction: ExtractionConfig,
    /// File to read
    pub path: PathBuf,
    /// Folder to file the records under
    pub batch: Option<String>,
}

/// Strategy for importing one document.
///
/// Records are stored under the file's base name, inside `batch` when given.
#[derive(Debug, Clone, Copy)]
pub struct ImportStrategy;

impl super::CommandStrategy for ImportStrategy {
    type Input = ImportInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let file_name = input
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid file path: {}", input.path.display()))?
            .to_string();

        let bytes = tokio::fs::read(&input.path).await?;
        info!("Read {} bytes from {}", bytes.len(), input.path.display());

        let engine = ExtractionEngine::new(&input.extraction)?;
        let records = engine.extract_bytes(&bytes)?;
        if records.is_empty() {
            println!("No records found in {file_name}");
            return Ok(());
        }

        let stored = input
            .store
            .add_records(&file_name, input.batch.as_deref(), &records)
            .await?;
        println!("Imported {stored} records from {file_name}");
        Ok(())
    }
}
