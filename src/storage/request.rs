//! Request-scoped database access.

use super::Database;
use axum::{
    async_trait,
    extract::{Extension, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use sqlx::sqlite::SqliteConnection;
use std::sync::Arc;
use tracing::{debug, error};

/// Database handle owned by a single request.
///
/// The connection is opened lazily by [`RequestDb::conn`] and released when
/// the handle is dropped, whichever way the handler exits.
pub struct RequestDb {
    database: Arc<Database>,
    conn: Option<SqliteConnection>,
}

impl RequestDb {
    #[must_use]
    pub fn new(database: Arc<Database>) -> Self {
        Self {
            database,
            conn: None,
        }
    }

    /// Connection for this request, opened on first call.
    ///
    /// # Errors
    /// Returns an error if the database file cannot be opened.
    pub async fn conn(&mut self) -> Result<&mut SqliteConnection, sqlx::Error> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => {
                let conn = self.database.acquire().await?;
                let held = self.database.lease();
                debug!(held, "Opened database connection");

                conn
            }
        };

        Ok(self.conn.insert(conn))
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }
}

impl Drop for RequestDb {
    fn drop(&mut self) {
        if self.conn.take().is_some() {
            let held = self.database.release();
            debug!(held, "Released database connection");
        }
    }
}

impl std::fmt::Debug for RequestDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestDb")
            .field("path", &self.database.path())
            .field("open", &self.is_open())
            .finish()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestDb
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(database) = Extension::<Arc<Database>>::from_request_parts(parts, state)
            .await
            .map_err(|err| {
                error!("Database is not configured: {}", err);

                (StatusCode::INTERNAL_SERVER_ERROR, "Database is not configured")
            })?;

        Ok(Self::new(database))
    }
}
