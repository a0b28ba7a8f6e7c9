//! PAC error types
//!
//! Every decode failure carries the entry index or the observed value that
//! caused it, so a bad archive can be diagnosed from the error alone.

use thiserror::Error;

/// PAC-specific error type
#[derive(Debug, Error)]
pub enum PacError {
    /// Stream ended before the fixed header was complete
    #[error("truncated header: need {expected} bytes, got {actual}")]
    TruncatedHeader {
        /// Header size in bytes
        expected: usize,
        /// Bytes actually available
        actual: usize,
    },

    /// Magic bytes are not `add\0`
    #[error("invalid PAC magic: expected [61 64 64 00], got {0:02X?}")]
    BadMagic([u8; 4]),

    /// Version field is not the supported value
    #[error("unsupported PAC version: expected {expected}, got {actual}")]
    UnsupportedVersion {
        /// Supported version
        expected: u32,
        /// Version read from the header
        actual: u32,
    },

    /// Index slot lies outside the stream
    #[error("entry {index}: index offset {offset} is past end of stream ({stream_len} bytes)")]
    BadIndexOffset {
        /// Entry index
        index: usize,
        /// Computed `index_ptr + index * index_stride`
        offset: u64,
        /// Total stream length
        stream_len: u64,
    },

    /// Fixed entry record is cut short
    #[error("entry {index}: truncated index record at offset {offset}")]
    TruncatedEntry {
        /// Entry index
        index: usize,
        /// Offset of the record
        offset: u64,
    },

    /// No NUL terminator before end of stream
    #[error("entry {index}: filename at offset {offset} is not NUL-terminated")]
    UnterminatedFilename {
        /// Entry index
        index: usize,
        /// Value of `filename_ptr`
        offset: u64,
    },

    /// Payload range runs past end of stream
    #[error(
        "entry {index}: payload at offset {offset} needs {expected} bytes, only {actual} available"
    )]
    TruncatedPayload {
        /// Entry index
        index: usize,
        /// Value of `data_ptr`
        offset: u64,
        /// Value of `data_len`
        expected: u64,
        /// Bytes available from `data_ptr` to end of stream
        actual: u64,
    },

    /// Header count disagrees with the entry list
    #[error("entry count mismatch: header declares {declared}, archive holds {actual}")]
    EntryCountMismatch {
        /// `count` field of the header
        declared: u32,
        /// Number of entries in the archive
        actual: usize,
    },

    /// Payload too large for the 32-bit length field
    #[error("entry {index}: payload length {length} does not fit in 32 bits")]
    NonRepresentableLength {
        /// Entry index
        index: usize,
        /// Payload length in bytes
        length: u64,
    },

    /// Layout needs an offset beyond the 32-bit address space
    #[error("archive layout needs offset {offset}, beyond the 32-bit limit")]
    OffsetOverflow {
        /// Offending absolute offset
        offset: u64,
    },

    /// Filename is not valid UTF-8 or contains a NUL byte
    #[error("entry {index}: invalid filename: {reason}")]
    InvalidFilename {
        /// Entry index
        index: usize,
        /// What is wrong with it
        reason: String,
    },

    /// Header index geometry cannot be encoded
    #[error("invalid layout: {reason}")]
    InvalidLayout {
        /// Description of the conflict
        reason: String,
    },

    /// Fixed-record codec error
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),

    /// Underlying I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for PAC operations
pub type PacResult<T> = Result<T, PacError>;

/// Machine-readable classification of a [`PacError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacErrorKind {
    /// See [`PacError::TruncatedHeader`]
    TruncatedHeader,
    /// See [`PacError::BadMagic`]
    BadMagic,
    /// See [`PacError::UnsupportedVersion`]
    UnsupportedVersion,
    /// See [`PacError::BadIndexOffset`]
    BadIndexOffset,
    /// See [`PacError::TruncatedEntry`]
    TruncatedEntry,
    /// See [`PacError::UnterminatedFilename`]
    UnterminatedFilename,
    /// See [`PacError::TruncatedPayload`]
    TruncatedPayload,
    /// See [`PacError::EntryCountMismatch`]
    EntryCountMismatch,
    /// See [`PacError::NonRepresentableLength`]
    NonRepresentableLength,
    /// See [`PacError::OffsetOverflow`]
    OffsetOverflow,
    /// See [`PacError::InvalidFilename`]
    InvalidFilename,
    /// See [`PacError::InvalidLayout`]
    InvalidLayout,
    /// See [`PacError::BinRw`]
    BinRw,
    /// See [`PacError::Io`]
    Io,
}

impl PacError {
    /// Classify this error
    pub fn kind(&self) -> PacErrorKind {
        match self {
            Self::TruncatedHeader { .. } => PacErrorKind::TruncatedHeader,
            Self::BadMagic(_) => PacErrorKind::BadMagic,
            Self::UnsupportedVersion { .. } => PacErrorKind::UnsupportedVersion,
            Self::BadIndexOffset { .. } => PacErrorKind::BadIndexOffset,
            Self::TruncatedEntry { .. } => PacErrorKind::TruncatedEntry,
            Self::UnterminatedFilename { .. } => PacErrorKind::UnterminatedFilename,
            Self::TruncatedPayload { .. } => PacErrorKind::TruncatedPayload,
            Self::EntryCountMismatch { .. } => PacErrorKind::EntryCountMismatch,
            Self::NonRepresentableLength { .. } => PacErrorKind::NonRepresentableLength,
            Self::OffsetOverflow { .. } => PacErrorKind::OffsetOverflow,
            Self::InvalidFilename { .. } => PacErrorKind::InvalidFilename,
            Self::InvalidLayout { .. } => PacErrorKind::InvalidLayout,
            Self::BinRw(_) => PacErrorKind::BinRw,
            Self::Io(_) => PacErrorKind::Io,
        }
    }

    /// Index of the entry that caused the error, if any
    pub fn entry_index(&self) -> Option<usize> {
        match self {
            Self::BadIndexOffset { index, .. }
            | Self::TruncatedEntry { index, .. }
            | Self::UnterminatedFilename { index, .. }
            | Self::TruncatedPayload { index, .. }
            | Self::NonRepresentableLength { index, .. }
            | Self::InvalidFilename { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Create an invalid layout error
    pub fn invalid_layout<S: Into<String>>(reason: S) -> Self {
        Self::InvalidLayout {
            reason: reason.into(),
        }
    }
}
