//! Parser and builder for PAC game archives
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::uninlined_format_args)] // Backwards compatibility
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::return_self_not_must_use)] // Builder patterns
//! PAC is the container format a game engine uses to bundle named files into
//! one archive. Its index records point at filenames and payloads through
//! absolute offsets, so decoding is a matter of following those pointers.
//!
//! # Design Principles
//!
//! - **Symmetric Operations**: Both parsing and building supported
//! - **Bounded Reads**: Every pointer is checked against the stream length
//!   before anything is allocated
//! - **Typed Errors**: Each failure carries the entry index or observed value
//! - **Round-Trip Guarantee**: parse(build(archive)) preserves entry order,
//!   filenames, payloads and the opaque record fields

#![warn(missing_docs)]

/// PAC archive codec
///
/// See the [`pac`] module for the binary layout and usage examples.
pub mod pac;

// Test utilities module
#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod test_utils;

pub use pac::{PacArchive, PacBuilder, PacEntry, PacError, PacHeader, PacResult};

/// Common format trait for the PAC types
pub trait PacFormat: Sized {
    /// Parse from bytes
    fn parse(data: &[u8]) -> PacResult<Self>;

    /// Build to bytes
    fn build(&self) -> PacResult<Vec<u8>>;
}
