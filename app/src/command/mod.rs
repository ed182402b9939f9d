//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy with its own input type. Commands
//! that touch the database receive the shared [`RecordStore`] opened once by
//! `main`.

use serde::Serialize;
use voterroll_config::Config;
use voterroll_core::{Record, RelationTag};
use voterroll_store::{ConnectOptions, RecordStore};

mod edit;
mod files;
mod import;
mod info;
mod init;
mod relations;
mod search;
mod show;
mod stats;
mod version;

pub use edit::{ClearStrategy, DeleteInput, DeleteStrategy, UpdateInput, UpdateStrategy};
pub use files::{DeleteFileStrategy, FilesStrategy};
pub use import::{ImportInput, ImportStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use relations::{MarkInput, MarkStrategy, RelationsInput, RelationsStrategy};
pub use search::{SearchInput, SearchStrategy};
pub use show::{ShowInput, ShowStrategy};
pub use stats::{StatsInput, StatsStrategy};
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
///
/// # Example
/// ```rust,ignore
/// struct MyStrategy;
///
/// impl CommandStrategy for MyStrategy {
///     type Input = MyInput;
///
///     async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Connection options for the configured database.
pub fn connect_options(config: &Config) -> anyhow::Result<ConnectOptions> {
    let mut options = ConnectOptions::new(config.database_url()?);
    options
        .max_connections(config.database.max_connections)
        .sqlx_logging(false);
    Ok(options)
}

/// Open the configured store.
pub async fn open_store(config: &Config) -> anyhow::Result<RecordStore> {
    let options = connect_options(config)?;
    Ok(RecordStore::connect(options, config.store.clone()).await?)
}

/// Output mode selected on the command line.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    /// Print `value` as JSON, or run `human` for plain text output.
    fn emit<T: Serialize + ?Sized>(self, value: &T, human: impl FnOnce()) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human();
        }
        Ok(())
    }
}

fn print_record(record: &Record) {
    println!("#{} [{}]", record.id, record.provenance);
    for (field, value) in record.fields.present() {
        println!("  {}: {value}", field.label());
    }
}

fn print_tag(tag: &RelationTag) {
    let folder = tag.folder.as_deref().unwrap_or("-");
    println!(
        "#{} {} [{} / {}] tagged {}",
        tag.record_id,
        tag.kind,
        folder,
        tag.file_name,
        tag.created_at.format("%Y-%m-%d %H:%M")
    );
    for (field, value) in tag.fields.present() {
        println!("  {}: {value}", field.label());
    }
}
