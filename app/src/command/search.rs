use std::sync::Arc;
use voterroll_core::SearchCriteria;
use voterroll_store::RecordStore;

use super::{Output, print_record};

pub struct SearchInput {
    pub store: Arc<RecordStore>,
    pub output: Output,
    pub criteria: SearchCriteria,
}

/// Strategy for case-insensitive substring search across all records.
#[derive(Debug, Clone, Copy)]
pub struct SearchStrategy;

impl super::CommandStrategy for SearchStrategy {
    type Input = SearchInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let records = input.store.search_records(&input.criteria).await?;
        input.output.emit(&records, || {
            println!("{} matching records\n", records.len());
            for record in &records {
                print_record(record);
            }
        })
    }
}
