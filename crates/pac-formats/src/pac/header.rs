//! PAC header structure and validation
//!
//! The header is a 24-byte little-endian record at offset 0:
//! - 4-byte magic `add\0`
//! - 4-byte version (always 4)
//! - 4-byte absolute offset of the first index record
//! - 4-byte size of one index record
//! - 4-byte entry count
//! - 4-byte declared archive size

use crate::pac::error::{PacError, PacResult};
use crate::pac::utils::read_full;
use binrw::{BinRead, BinWrite};
use serde::{Serialize, Serializer};
use std::io::{Cursor, Read, Write};
use tracing::debug;

/// PAC magic bytes
pub const PAC_MAGIC: [u8; 4] = *b"add\0";

/// The only archive version understood by this crate
pub const PAC_VERSION: u32 = 4;

/// Size of the encoded header in bytes
pub const HEADER_SIZE: usize = 24;

/// Offset the game's own archives place the index at
pub const DEFAULT_INDEX_PTR: u32 = 32;

/// Record size the game's own archives use
pub const DEFAULT_INDEX_STRIDE: u32 = 32;

/// PAC file header
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite, Serialize)]
#[brw(little)]
pub struct PacHeader {
    /// Magic number, `add\0` in a valid archive
    #[serde(serialize_with = "serialize_magic")]
    pub magic: [u8; 4],

    /// Archive version
    pub version: u32,

    /// Absolute offset of the first index record
    pub index_ptr: u32,

    /// Distance between consecutive index records
    ///
    /// The game hardcodes 32, but the value in the file decides where the
    /// i-th record is looked up.
    pub index_stride: u32,

    /// Number of entries
    pub count: u32,

    /// Declared total archive size
    ///
    /// Informational only; never used to bound reads.
    pub file_len: u32,
}

fn serialize_magic<S: Serializer>(magic: &[u8; 4], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(&magic[..3]))
}

impl Default for PacHeader {
    fn default() -> Self {
        Self::new(0)
    }
}

impl PacHeader {
    /// Header for `count` entries using the conventional index geometry
    pub fn new(count: u32) -> Self {
        Self {
            magic: PAC_MAGIC,
            version: PAC_VERSION,
            index_ptr: DEFAULT_INDEX_PTR,
            index_stride: DEFAULT_INDEX_STRIDE,
            count,
            file_len: 0,
        }
    }

    /// Read and validate a header.
    ///
    /// The reader must be positioned at the start of the archive. Exactly
    /// [`HEADER_SIZE`] bytes are consumed on success.
    pub fn read_from<R: Read>(reader: &mut R) -> PacResult<Self> {
        let mut buf = [0u8; HEADER_SIZE];
        let actual = read_full(reader, &mut buf)?;
        if actual < HEADER_SIZE {
            return Err(PacError::TruncatedHeader {
                expected: HEADER_SIZE,
                actual,
            });
        }

        let header = Self::read_le(&mut Cursor::new(&buf[..]))?;
        header.validate()?;

        debug!(
            "PAC header: index_ptr={} index_stride={} count={} file_len={}",
            header.index_ptr, header.index_stride, header.count, header.file_len
        );
        Ok(header)
    }

    /// Write the header, always emitting the canonical magic
    pub fn write_to<W: Write>(&self, writer: &mut W) -> PacResult<()> {
        let canonical = Self {
            magic: PAC_MAGIC,
            ..self.clone()
        };
        let mut cursor = Cursor::new(Vec::with_capacity(HEADER_SIZE));
        canonical.write_le(&mut cursor)?;
        writer.write_all(cursor.get_ref())?;
        Ok(())
    }

    /// Check magic, then version
    pub fn validate(&self) -> PacResult<()> {
        if self.magic != PAC_MAGIC {
            return Err(PacError::BadMagic(self.magic));
        }
        if self.version != PAC_VERSION {
            return Err(PacError::UnsupportedVersion {
                expected: PAC_VERSION,
                actual: self.version,
            });
        }
        Ok(())
    }

    /// Absolute offset of the `index`-th record
    pub fn record_offset(&self, index: u32) -> u64 {
        u64::from(self.index_ptr) + u64::from(index) * u64::from(self.index_stride)
    }

    /// Magic as text, without the padding byte
    pub fn magic_str(&self) -> String {
        String::from_utf8_lossy(&self.magic[..3]).into_owned()
    }
}

impl crate::PacFormat for PacHeader {
    fn parse(data: &[u8]) -> PacResult<Self> {
        Self::read_from(&mut Cursor::new(data))
    }

    fn build(&self) -> PacResult<Vec<u8>> {
        let mut output = Vec::with_capacity(HEADER_SIZE);
        self.write_to(&mut output)?;
        Ok(output)
    }
}
