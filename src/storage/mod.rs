//! SQLite persistence for user accounts.
//!
//! [`Database`] only knows where the file lives; it never holds a connection.
//! Handlers get a [`RequestDb`], which opens a connection the first time it is
//! used and closes it when the request is done with it.

pub mod request;
pub mod users;

pub use self::request::RequestDb;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteConnection},
    Connection,
};
use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};
use tracing::{debug, info_span, Instrument};

/// Schema applied by `minduwc init-db`.
pub const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

/// Location of the SQLite database file.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
    options: SqliteConnectOptions,
    held: Arc<AtomicUsize>,
}

impl Database {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);

        Self {
            path,
            options,
            held: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Connections currently held by [`RequestDb`] handles.
    #[must_use]
    pub fn held_connections(&self) -> usize {
        self.held.load(Ordering::SeqCst)
    }

    fn lease(&self) -> usize {
        self.held.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn release(&self) -> usize {
        self.held.fetch_sub(1, Ordering::SeqCst) - 1
    }

    /// Open a new connection to the database file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or created.
    pub async fn acquire(&self) -> Result<SqliteConnection, sqlx::Error> {
        let span = info_span!(
            "db.acquire",
            db.system = "sqlite",
            db.operation = "ACQUIRE",
            db.name = %self.path.display()
        );

        SqliteConnection::connect_with(&self.options)
            .instrument(span)
            .await
    }

    /// Create the `users` table if it does not exist yet.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or the schema fails to apply.
    pub async fn init(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.acquire().await?;

        let span = info_span!(
            "db.query",
            db.system = "sqlite",
            db.operation = "CREATE",
            db.statement = SCHEMA_SQL
        );
        sqlx::raw_sql(SCHEMA_SQL)
            .execute(&mut conn)
            .instrument(span)
            .await?;

        debug!("Schema applied to {}", self.path.display());

        conn.close().await
    }
}
