use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

pub const ARG_DATABASE: &str = "database";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_DATABASE)
            .short('d')
            .long("database")
            .help("Path to the SQLite database file")
            .default_value("minduwc.db")
            .env("MINDUWC_DATABASE")
            .global(true)
            .value_parser(clap::value_parser!(PathBuf)),
    )
}

#[derive(Debug)]
pub struct Options {
    pub path: PathBuf,
}

impl Options {
    /// # Errors
    /// Returns an error if the database path is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let path = matches
            .get_one::<PathBuf>(ARG_DATABASE)
            .cloned()
            .context("missing required argument: --database")?;

        Ok(Self { path })
    }
}
