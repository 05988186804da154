use crate::{api, cli::telemetry, storage::Database};
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub database: PathBuf,
    pub static_dir: Option<PathBuf>,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn execute(args: Args) -> Result<()> {
    debug!("Server args: {:?}", args);

    if !args.database.exists() {
        warn!(
            "Database {} does not exist yet, run `minduwc init-db` to create it",
            args.database.display()
        );
    }

    if let Some(dir) = &args.static_dir {
        if !dir.is_dir() {
            warn!("Static directory {} not found", dir.display());
        }
    }

    let result = api::new(args.port, Database::new(args.database), args.static_dir).await;

    telemetry::shutdown_tracer();

    result
}
