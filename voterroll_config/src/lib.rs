mod schema;

pub use schema::{Config, DATABASE_URL_ENV, DatabaseConfig};
