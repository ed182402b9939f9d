#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

mod command;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use voterroll_config::Config;
use voterroll_core::{Field, RecordFields, RelationKind, SearchCriteria};
use voterroll_store::RecordStore;

use command::{
    ClearStrategy, CommandStrategy, DeleteFileStrategy, DeleteInput, DeleteStrategy,
    FilesStrategy, ImportInput, ImportStrategy, InfoStrategy, InitStrategy, MarkInput,
    MarkStrategy, Output, RelationsInput, RelationsStrategy, SearchInput, SearchStrategy,
    ShowInput, ShowStrategy, StatsInput, StatsStrategy, UpdateInput, UpdateStrategy,
    VersionStrategy,
};

#[derive(Parser)]
#[command(name = "voterroll")]
#[command(about = "Voter-roll record extraction and storage", long_about = None)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// One optional value per record field.
#[derive(Args, Debug, Default)]
struct FieldArgs {
    #[arg(long)]
    serial_number: Option<String>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    voter_number: Option<String>,
    #[arg(long)]
    father_name: Option<String>,
    #[arg(long)]
    mother_name: Option<String>,
    #[arg(long)]
    occupation: Option<String>,
    #[arg(long)]
    date_of_birth: Option<String>,
    #[arg(long)]
    address: Option<String>,
}

impl FieldArgs {
    fn into_pairs(self) -> impl Iterator<Item = (Field, String)> {
        [
            (Field::SerialNumber, self.serial_number),
            (Field::Name, self.name),
            (Field::VoterNumber, self.voter_number),
            (Field::FatherName, self.father_name),
            (Field::MotherName, self.mother_name),
            (Field::Occupation, self.occupation),
            (Field::DateOfBirth, self.date_of_birth),
            (Field::Address, self.address),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
    }

    fn into_criteria(self) -> SearchCriteria {
        self.into_pairs().collect()
    }

    fn into_patch(self) -> RecordFields {
        self.into_pairs()
            .fold(RecordFields::default(), |fields, (field, value)| {
                fields.with(field, value)
            })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Init,
    /// Show version
    Version,
    /// Show configuration and database status
    Info,
    /// Extract records from a voter-roll text file and store them
    Import {
        /// Path of the text file
        path: PathBuf,

        /// Folder to file the records under
        #[arg(short, long)]
        batch: Option<String>,
    },
    /// List stored file names
    Files,
    /// Show one page of the records of a file
    Show {
        /// Stored file name, as listed by `files`
        file: String,

        #[arg(short, long, default_value_t = 1)]
        page: u64,

        #[arg(long, default_value_t = 20)]
        page_size: u64,
    },
    /// Search records; every given field must match
    Search {
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Occupation counts
    Stats {
        /// Folder to count, or "all"
        #[arg(short, long)]
        folder: Option<String>,
    },
    /// Tag a record as friend or enemy, or clear its tag with "none"
    Mark { id: i32, kind: RelationKind },
    /// List tagged records
    Relations {
        kind: RelationKind,

        #[arg(short, long)]
        folder: Option<String>,
    },
    /// Edit fields of a record
    Update {
        id: i32,

        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a record and its tag
    Delete { id: i32 },
    /// Delete every record of a stored file
    DeleteFile { file: String },
    /// Delete all records and tags
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let output = Output::new(cli.json);

    match cli.command {
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Version => VersionStrategy.execute(()).await,
        Commands::Info => InfoStrategy.execute(()).await,
        command => run_with_store(command, output).await,
    }
}

/// Open the store once, run `command` against it and close it again.
async fn run_with_store(command: Commands, output: Output) -> anyhow::Result<()> {
    let config = Config::load()?;
    info!("Loaded config from {}", Config::config_path()?.display());

    let store = Arc::new(command::open_store(&config).await?);

    let result = dispatch(command, Arc::clone(&store), &config, output).await;

    match Arc::try_unwrap(store) {
        Ok(store) => store.close().await?,
        Err(_) => warn!("Store still shared at shutdown; skipping close"),
    }
    result
}

async fn dispatch(
    command: Commands,
    store: Arc<RecordStore>,
    config: &Config,
    output: Output,
) -> anyhow::Result<()> {
    match command {
        Commands::Import { path, batch } => {
            ImportStrategy
                .execute(ImportInput {
                    store,
                    extraction: config.extraction.clone(),
                    path,
                    batch,
                })
                .await
        }
        Commands::Files => FilesStrategy.execute((store, output)).await,
        Commands::Show {
            file,
            page,
            page_size,
        } => {
            ShowStrategy
                .execute(ShowInput {
                    store,
                    output,
                    file,
                    page,
                    page_size,
                })
                .await
        }
        Commands::Search { fields } => {
            SearchStrategy
                .execute(SearchInput {
                    store,
                    output,
                    criteria: fields.into_criteria(),
                })
                .await
        }
        Commands::Stats { folder } => {
            StatsStrategy
                .execute(StatsInput {
                    store,
                    output,
                    folder,
                })
                .await
        }
        Commands::Mark { id, kind } => MarkStrategy.execute(MarkInput { store, id, kind }).await,
        Commands::Relations { kind, folder } => {
            RelationsStrategy
                .execute(RelationsInput {
                    store,
                    output,
                    kind,
                    folder,
                })
                .await
        }
        Commands::Update { id, fields } => {
            UpdateStrategy
                .execute(UpdateInput {
                    store,
                    id,
                    patch: fields.into_patch(),
                })
                .await
        }
        Commands::Delete { id } => DeleteStrategy.execute(DeleteInput { store, id }).await,
        Commands::DeleteFile { file } => DeleteFileStrategy.execute((store, file)).await,
        Commands::Clear => ClearStrategy.execute(store).await,
        Commands::Init | Commands::Version | Commands::Info => Ok(()),
    }
}
