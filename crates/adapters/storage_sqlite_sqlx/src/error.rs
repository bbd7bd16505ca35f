//! Errors of the `SQLite` historian.

use ladsim_domain::error::LadsError;
use ladsim_domain::id::NodeId;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The connection URL does not name a `SQLite` database.
    #[error("unsupported database url {0:?}, expected a sqlite: url")]
    UnsupportedUrl(String),

    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A data value could not be encoded for storage.
    #[error("cannot encode value of {node}")]
    Encode {
        node: NodeId,
        #[source]
        source: serde_json::Error,
    },
}

impl From<StorageError> for LadsError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_into_storage_error_of_domain() {
        let err: LadsError = StorageError::UnsupportedUrl("postgres://db".to_string()).into();
        assert!(matches!(err, LadsError::Storage(_)));
        assert!(err.to_string().contains("storage"));
    }
}
