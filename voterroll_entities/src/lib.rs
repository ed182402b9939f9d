//! Database entities for the voter-roll record store.

pub mod records;
pub mod relations;
