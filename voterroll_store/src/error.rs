use sea_orm::DbErr;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection-level failure; worth retrying after a reconnect.
    #[error("storage connection error: {0}")]
    Connection(#[source] DbErr),

    /// Constraint, query or data error; retrying will not help.
    #[error("storage error: {0}")]
    Database(#[source] DbErr),

    #[error("configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Stable classification used by the retry layer and by callers.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        if is_connection_error(&err) {
            Self::Connection(err)
        } else {
            Self::Database(err)
        }
    }
}

/// Driver messages that indicate the session itself is gone rather than the
/// statement being wrong.
const CONNECTION_MARKERS: [&str; 7] = [
    "connection reset",
    "connection refused",
    "connection closed",
    "broken pipe",
    "pool timed out",
    "pool closed",
    "timed out",
];

fn is_connection_error(err: &DbErr) -> bool {
    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => true,
        DbErr::Exec(_) | DbErr::Query(_) => {
            let message = err.to_string().to_lowercase();
            CONNECTION_MARKERS.iter().any(|m| message.contains(m))
        }
        _ => false,
    }
}
