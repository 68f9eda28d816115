//! Error types for parkade storage operations.

/// Errors that can occur during data store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataStoreError {
    /// The requested row was not found in the data store.
    NotFound,
    /// A row with the same unique key already exists.
    AlreadyExists,
    /// A foreign key pointed at a row that does not exist.
    MissingReference,
    /// An internal storage system error occurred.
    Internal(String),
}

impl std::fmt::Display for DataStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "Item not found in data store"),
            Self::AlreadyExists => write!(f, "Item already exists in data store"),
            Self::MissingReference => write!(f, "Referenced item does not exist"),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl From<sqlx::Error> for DataStoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => DataStoreError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DataStoreError::AlreadyExists
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                DataStoreError::MissingReference
            }
            _ => DataStoreError::Internal(e.to_string()),
        }
    }
}

impl std::error::Error for DataStoreError {}
