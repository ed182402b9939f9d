use std::sync::Arc;
use voterroll_store::RecordStore;

use super::{Output, print_record};

/// Input parameters for the Show command strategy.
pub struct ShowInput {
    pub store: Arc<RecordStore>,
    pub output: Output,
    pub file: String,
    /// 1-based page number
    pub page: u64,
    pub page_size: u64,
}

/// Strategy for paging through the records of one file.
#[derive(Debug, Clone, Copy)]
pub struct ShowStrategy;

impl super::CommandStrategy for ShowStrategy {
    type Input = ShowInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let page = input
            .store
            .get_records(&input.file, input.page, input.page_size)
            .await?;

        input.output.emit(&page, || {
            println!(
                "{}: page {} of {} ({} records)\n",
                input.file,
                page.page,
                page.pages.max(1),
                page.total
            );
            for record in &page.items {
                print_record(record);
            }
        })
    }
}
