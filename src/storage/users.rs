use sqlx::{sqlite::SqliteConnection, FromRow};
use tracing::{info_span, Instrument};

/// A row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub email: String,
    pub password_hash: String,
}

/// Outcome of a registration insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Created,
    Conflict,
}

/// Look up the account matching both email and password digest.
///
/// # Errors
/// Returns an error if the query fails.
pub async fn find_by_credentials(
    conn: &mut SqliteConnection,
    email: &str,
    password_hash: &str,
) -> Result<Option<User>, sqlx::Error> {
    let query = "SELECT email, password_hash FROM users WHERE email = ? AND password_hash = ?";
    let span = info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "SELECT",
        db.statement = query
    );

    sqlx::query_as::<_, User>(query)
        .bind(email)
        .bind(password_hash)
        .fetch_optional(&mut *conn)
        .instrument(span)
        .await
}

/// Insert a new account. A taken email is reported as [`InsertOutcome::Conflict`].
///
/// # Errors
/// Returns an error for any failure other than the uniqueness constraint.
pub async fn insert(
    conn: &mut SqliteConnection,
    email: &str,
    password_hash: &str,
) -> Result<InsertOutcome, sqlx::Error> {
    let query = "INSERT INTO users (email, password_hash) VALUES (?, ?)";
    let span = info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "INSERT",
        db.statement = query
    );

    match sqlx::query(query)
        .bind(email)
        .bind(password_hash)
        .execute(&mut *conn)
        .instrument(span)
        .await
    {
        Ok(_) => Ok(InsertOutcome::Created),
        Err(err) if is_unique_violation(&err) => Ok(InsertOutcome::Conflict),
        Err(err) => Err(err),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
