//! PAC archive command-line tool
//!
//! This library provides the command handlers behind the `pac` binary:
//! - `show`: print the decoded index of an archive
//! - `dump`: extract every entry, plus metadata sidecars, into a directory
//! - `repack`: rebuild an archive from a dump directory
//!
//! The binary only parses arguments, installs logging and dispatches here.

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod commands;
pub mod error;
pub mod layout;

pub use error::DumpError;

use clap::{Subcommand, ValueEnum};
use std::path::PathBuf;

/// Top-level subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the index of a .pac archive
    Show {
        /// Archive to read
        file: PathBuf,
    },

    /// Dump the contents of a .pac archive to a directory
    ///
    /// Each entry yields two files: NNN_filename and NNN_filename.json, the
    /// latter holding the index fields that cannot be encoded in the file
    /// itself. NNN is the entry's sequence number, starting at 000.
    Dump {
        /// Archive to read
        file: PathBuf,

        /// Output directory; defaults to the archive's base name without
        /// the .pac suffix
        #[arg(short, long, env = "PAC_DUMP_OUT")]
        out: Option<PathBuf>,
    },

    /// Reassemble a directory dump into a .pac archive
    Repack {
        /// Dump directory produced by `pac dump`
        dir: PathBuf,

        /// Output archive; defaults to the directory name plus .pac
        #[arg(short, long, env = "PAC_REPACK_OUT")]
        out: Option<PathBuf>,
    },
}

/// Output format for `show`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON output
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_debug() {
        assert_eq!(format!("{:?}", OutputFormat::Text), "Text");
        assert_eq!(format!("{:?}", OutputFormat::Json), "Json");
        assert_eq!(format!("{:?}", OutputFormat::JsonPretty), "JsonPretty");
    }

    #[test]
    fn test_output_format_value_names() {
        let json_pretty = OutputFormat::JsonPretty.to_possible_value().unwrap();
        assert_eq!(json_pretty.get_name(), "json-pretty");
    }
}
