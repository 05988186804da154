use crate::cli::{actions::Action, commands, dispatch, telemetry};
use anyhow::{Context, Result};

/// Map verbosity count to tracing level
const fn get_verbosity_level(verbosity: u8) -> Option<tracing::Level> {
    match verbosity {
        0 => None,
        1 => Some(tracing::Level::WARN),
        2 => Some(tracing::Level::INFO),
        3 => Some(tracing::Level::DEBUG),
        _ => Some(tracing::Level::TRACE),
    }
}

/// Load `.env` from the working directory; a missing file is fine.
fn load_dotenv() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(err).context("Failed to load .env"),
    }
}

/// Main entry point for the CLI - builds and returns the Action
///
/// # Errors
///
/// Returns an error if `.env` is malformed, telemetry initialization fails, or action dispatch fails
pub fn start() -> Result<Action> {
    // 1. Environment from .env, before clap reads env fallbacks
    load_dotenv()?;

    // 2. Parse command-line arguments
    let matches = commands::new().get_matches();

    // 3. Extract verbosity level
    let verbosity_level = get_verbosity_level(commands::verbosity(&matches));

    // 4. Initialize telemetry
    telemetry::init(verbosity_level)?;

    // 5. Dispatch to appropriate action
    dispatch::handler(&matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(get_verbosity_level(0), None);
        assert_eq!(get_verbosity_level(1), Some(tracing::Level::WARN));
        assert_eq!(get_verbosity_level(2), Some(tracing::Level::INFO));
        assert_eq!(get_verbosity_level(3), Some(tracing::Level::DEBUG));
        assert_eq!(get_verbosity_level(4), Some(tracing::Level::TRACE));
        assert_eq!(get_verbosity_level(9), Some(tracing::Level::TRACE));
    }
}
