//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to an action: run the server, or create the
//! database tables with `init-db`.

use crate::cli::actions::{init_db, server, Action};
use crate::cli::commands::{database, ARG_PORT, ARG_STATIC_DIR, CMD_INIT_DB};
use anyhow::{anyhow, Result};
use std::path::PathBuf;

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or the subcommand is unknown.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some((CMD_INIT_DB, sub_m)) => {
            let database = database::Options::parse(sub_m)?;

            Ok(Action::InitDb(init_db::Args {
                database: database.path,
            }))
        }

        Some((name, _)) => Err(anyhow!("unknown subcommand: {name}")),

        None => {
            let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(5000);
            let database = database::Options::parse(matches)?;
            let static_dir = matches.get_one::<PathBuf>(ARG_STATIC_DIR).cloned();

            Ok(Action::Server(server::Args {
                port,
                database: database.path,
                static_dir,
            }))
        }
    }
}
