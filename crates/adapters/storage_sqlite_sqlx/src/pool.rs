//! `SQLite` connection pool setup and migration runner.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use crate::error::StorageError;
use crate::history_repo::SqliteHistoryRepository;

const DEFAULT_MAX_CONNECTIONS: u32 = 4;

/// Configuration for the `SQLite` historian.
#[derive(Debug, Clone)]
pub struct Config {
    /// `SQLite` connection URL (e.g. `sqlite:ladsim.db?mode=rwc` or `sqlite::memory:`).
    pub database_url: String,
    /// Upper bound of pooled connections for file databases.
    pub max_connections: u32,
}

impl Config {
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// A private database living as long as the returned [`Database`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new("sqlite::memory:")
    }

    /// Read configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `LADSIM_DATABASE_URL` is not set.
    pub fn from_env() -> Result<Self, std::env::VarError> {
        std::env::var("LADSIM_DATABASE_URL").map(Self::new)
    }

    fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }

    /// Open the pool and run all pending migrations.
    ///
    /// File databases are created if missing and use WAL journaling. An
    /// in-memory database is held on a single connection that is never
    /// recycled, since closing it would discard the data.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the URL is not a `SQLite` URL, or if the
    /// connection or migrations fail.
    pub async fn build(self) -> Result<Database, StorageError> {
        if !self.database_url.starts_with("sqlite:") {
            return Err(StorageError::UnsupportedUrl(self.database_url));
        }
        let in_memory = self.is_in_memory();
        let mut options = SqliteConnectOptions::from_str(&self.database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            options = options.journal_mode(SqliteJournalMode::Wal);
            SqlitePoolOptions::new().max_connections(self.max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!(url = %self.database_url, in_memory, "history database ready");

        Ok(Database { pool })
    }
}

/// Migrated `SQLite` pool backing the historian.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Borrow the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// A historian sharing this database's pool.
    #[must_use]
    pub fn history(&self) -> SqliteHistoryRepository {
        SqliteHistoryRepository::new(self.pool.clone())
    }
}
