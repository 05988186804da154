use crate::storage::Database;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub database: PathBuf,
}

/// Create the database tables.
/// # Errors
/// Returns an error if the database cannot be opened or the schema fails to apply.
pub async fn execute(args: Args) -> Result<()> {
    let database = Database::new(args.database);

    database
        .init()
        .await
        .with_context(|| format!("Failed to initialize {}", database.path().display()))?;

    info!("Initialized {}", database.path().display());
    println!("Initialized the database.");

    Ok(())
}
