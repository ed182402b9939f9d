use std::sync::Arc;
use voterroll_core::RelationKind;
use voterroll_store::RecordStore;

use super::{Output, print_tag};

pub struct MarkInput {
    pub store: Arc<RecordStore>,
    pub id: i32,
    pub kind: RelationKind,
}

/// Strategy for tagging a record; `none` clears the tag.
#[derive(Debug, Clone, Copy)]
pub struct MarkStrategy;

impl super::CommandStrategy for MarkStrategy {
    type Input = MarkInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        if !input.store.mark_relation(input.id, input.kind).await? {
            anyhow::bail!("Record {} not found", input.id);
        }
        match input.kind {
            RelationKind::None => println!("Cleared tag of record {}", input.id),
            kind => println!("Record {} marked as {kind}", input.id),
        }
        Ok(())
    }
}

pub struct RelationsInput {
    pub store: Arc<RecordStore>,
    pub output: Output,
    pub kind: RelationKind,
    pub folder: Option<String>,
}

/// Strategy for listing tagged records.
#[derive(Debug, Clone, Copy)]
pub struct RelationsStrategy;

impl super::CommandStrategy for RelationsStrategy {
    type Input = RelationsInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let tags = input
            .store
            .get_relations_by_type(input.kind, input.folder.as_deref())
            .await?;

        input.output.emit(&tags, || {
            println!("{} records tagged {}\n", tags.len(), input.kind);
            for tag in &tags {
                print_tag(tag);
            }
        })
    }
}
