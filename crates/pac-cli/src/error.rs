//! Error types for dump and repack.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the directory dump conventions.
#[derive(Debug, Error)]
pub enum DumpError {
    /// Entry filename would escape the output directory
    #[error("entry {index}: refusing to write unsafe filename {filename:?}")]
    UnsafeFilename {
        /// Entry index
        index: usize,
        /// Filename stored in the archive
        filename: String,
    },

    /// File in a dump directory is not named `NNN_name`
    #[error("not a dump entry name: {0}")]
    BadEntryName(String),

    /// Two dump files claim the same sequence number
    #[error("duplicate sequence number {sequence}: {first} and {second}")]
    DuplicateSequence {
        /// Sequence number
        sequence: u32,
        /// First file with that number
        first: String,
        /// Second file with that number
        second: String,
    },

    /// Path has no usable final component
    #[error("cannot derive a default name from {}", .0.display())]
    NoDefaultName(PathBuf),
}
