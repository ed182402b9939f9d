#![warn(
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
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation
)]

mod cache;
mod convert;
mod error;
mod relations;
pub mod retry;
mod schema;
mod store;

pub use error::{Result, StoreError};
pub use retry::{Transient, retry_with_backoff};
pub use store::RecordStore;

// Re-export so callers can build connection options without a direct
// sea-orm dependency.
pub use sea_orm::ConnectOptions;
