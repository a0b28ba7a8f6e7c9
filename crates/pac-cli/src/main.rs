//! `pac` binary entry point.
//!
//! Parses arguments, initializes logging and hands off to the command
//! handlers in the `pac_cli` library.

use anyhow::Result;
use clap::Parser;
use pac_cli::{Commands, OutputFormat, commands};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "pac",
    about = "Inspect, dump and repack .pac game archives",
    version,
    author
)]
struct Cli {
    /// Set the logging level
    #[arg(
        short,
        long,
        value_enum,
        global = true,
        env = "PAC_LOG_LEVEL",
        default_value = "info"
    )]
    log_level: LogLevel,

    /// Output format for `show`
    #[arg(
        short,
        long,
        value_enum,
        global = true,
        env = "PAC_FORMAT",
        default_value = "text"
    )]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `show` output stays machine-readable
    tracing_subscriber::fmt()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    commands::handle(cli.command, cli.format)
}
