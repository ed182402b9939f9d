use std::sync::Arc;
use voterroll_core::ALL_FOLDERS;
use voterroll_store::RecordStore;

use super::Output;

pub struct StatsInput {
    pub store: Arc<RecordStore>,
    pub output: Output,
    pub folder: Option<String>,
}

/// Strategy for occupation statistics.
#[derive(Debug, Clone, Copy)]
pub struct StatsStrategy;

impl super::CommandStrategy for StatsStrategy {
    type Input = StatsInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let stats = input
            .store
            .get_occupation_stats(input.folder.as_deref())
            .await?;

        input.output.emit(&stats, || {
            println!(
                "Occupations in {}:",
                input.folder.as_deref().unwrap_or(ALL_FOLDERS)
            );
            for stat in &stats {
                println!("  {:>6}  {}", stat.count, stat.occupation);
            }
        })
    }
}
