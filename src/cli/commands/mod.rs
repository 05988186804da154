pub mod database;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ArgAction, ArgMatches, ColorChoice, Command,
};
use std::path::PathBuf;
use tracing::Level;

pub const CMD_INIT_DB: &str = "init-db";
pub const ARG_PORT: &str = "port";
pub const ARG_STATIC_DIR: &str = "static-dir";
pub const ARG_VERBOSITY: &str = "verbosity";

/// Log levels in `-v` order: no flag is ERROR, `-vvvv` is TRACE.
const LEVELS: [Level; 5] = [
    Level::ERROR,
    Level::WARN,
    Level::INFO,
    Level::DEBUG,
    Level::TRACE,
];

// MINDUWC_LOG_LEVEL takes a level name and stands in for the matching -v count.
fn parse_log_level(value: &str) -> Result<u8, String> {
    let level = value
        .parse::<Level>()
        .map_err(|_| format!("unknown log level '{value}', expected error|warn|info|debug|trace"))?;

    LEVELS
        .iter()
        .position(|l| *l == level)
        .and_then(|count| u8::try_from(count).ok())
        .ok_or_else(|| format!("unknown log level '{value}'"))
}

/// Verbosity from the subcommand if one ran, otherwise from the top level.
#[must_use]
pub fn verbosity(matches: &ArgMatches) -> u8 {
    let matches = matches.subcommand().map_or(matches, |(_, sub_m)| sub_m);
    matches.get_one::<u8>(ARG_VERBOSITY).copied().unwrap_or(0)
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("minduwc")
        .about("User registration and sign-in")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on, all interfaces")
                .default_value("5000")
                .env("MINDUWC_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_STATIC_DIR)
                .long("static-dir")
                .help("Directory served under /static")
                .env("MINDUWC_STATIC_DIR")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new(ARG_VERBOSITY)
                .short('v')
                .long("verbose")
                .help("Raise log verbosity, repeat up to -vvvv for TRACE")
                .env("MINDUWC_LOG_LEVEL")
                .global(true)
                .action(ArgAction::Count)
                .value_parser(parse_log_level),
        )
        .subcommand(Command::new(CMD_INIT_DB).about("Create the database tables"));

    database::with_args(command)
}
