//! PAC archive format implementation
//!
//! PAC archives bundle named files into one container. Index records do not
//! hold their filename and payload inline; they store absolute offsets, and
//! decoding follows those pointers wherever they lead.
//!
//! # Format Structure
//!
//! ```text
//! PAC File:
//! ├── Header (24 bytes, little-endian)
//! │   ├── Magic: "add\0" (4 bytes)
//! │   ├── Version (4 bytes) - Always 4
//! │   ├── Index Ptr (4 bytes) - Offset of the first index record
//! │   ├── Index Stride (4 bytes) - Size of one index record
//! │   ├── Count (4 bytes) - Number of entries
//! │   └── File Len (4 bytes) - Declared archive size
//! ├── Index (Count records at Index Ptr + i * Index Stride)
//! │   └── Per record (20 significant bytes):
//! │       ├── Data Ptr (4 bytes)
//! │       ├── Data Len (4 bytes)
//! │       ├── Unused (4 bytes) - Always 0
//! │       ├── Unknown (4 bytes)
//! │       └── Filename Ptr (4 bytes)
//! └── Filenames and payloads, anywhere in the file, in any order
//! ```
//!
//! Filenames and payloads may overlap or be shared between entries.
//!
//! # Usage
//!
//! ## Parsing a PAC archive
//!
//! ```rust,no_run
//! use pac_formats::pac::PacArchive;
//!
//! let mut file = std::fs::File::open("global.pac")?;
//! let archive = PacArchive::read_from(&mut file)?;
//!
//! for entry in &archive.entries {
//!     println!("{} ({} bytes)", entry.filename, entry.data.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Building a PAC archive
//!
//! ```rust
//! use pac_formats::pac::{PacArchive, PacBuilder};
//!
//! let mut builder = PacBuilder::new();
//! builder.add_file("a.txt", b"abc".to_vec());
//!
//! let data = builder.build()?;
//! let archive = PacArchive::from_bytes(&data)?;
//! assert_eq!(archive.entries[0].filename, "a.txt");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod builder;
mod entry;
mod error;
mod header;
mod utils;

pub use builder::{PacBuilder, PacLayout};
pub use entry::{ENTRY_RECORD_SIZE, EntryRecord, PacEntry};
pub use error::{PacError, PacErrorKind, PacResult};
pub use header::{
    DEFAULT_INDEX_PTR, DEFAULT_INDEX_STRIDE, HEADER_SIZE, PAC_MAGIC, PAC_VERSION, PacHeader,
};

use serde::Serialize;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use tracing::{debug, trace, warn};

/// Complete PAC archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PacArchive {
    /// Archive header
    pub header: PacHeader,
    /// Entries in index order
    pub entries: Vec<PacEntry>,
}

impl PacArchive {
    /// Create an archive from a header and entries
    pub fn new(header: PacHeader, entries: Vec<PacEntry>) -> Self {
        Self { header, entries }
    }

    /// Decode a complete archive.
    ///
    /// Decoding always starts from offset 0 of the stream, whatever its
    /// current position. The first failure is returned; no partial archive
    /// is produced. The stream is left at an unspecified position.
    pub fn read_from<R: Read + Seek>(reader: &mut R) -> PacResult<Self> {
        let stream_len = utils::stream_len(reader)?;
        reader.seek(SeekFrom::Start(0))?;

        let header = PacHeader::read_from(reader)?;

        // With a zero stride every slot aliases one record, so `count` alone
        // sets the amount of work
        if header.index_stride == 0 && header.count > 1 {
            warn!(
                "index_stride is 0: all {} entries share the record at {}",
                header.count, header.index_ptr
            );
        }
        // Caps the initial capacity only
        let capacity = (header.count as u64).min(stream_len / ENTRY_RECORD_SIZE as u64);
        let mut entries = Vec::with_capacity(capacity as usize);

        for i in 0..header.count {
            let index = i as usize;
            let offset = header.record_offset(i);
            if offset >= stream_len {
                return Err(PacError::BadIndexOffset {
                    index,
                    offset,
                    stream_len,
                });
            }

            let record = EntryRecord::read_at(reader, index, offset)?;
            let entry = PacEntry::resolve(reader, record, index, stream_len)?;
            trace!(
                "entry {}: {} ({} bytes at {})",
                index, entry.filename, record.data_len, record.data_ptr
            );
            entries.push(entry);
        }

        debug!(
            "Decoded PAC archive: {} entries, {} bytes",
            entries.len(),
            stream_len
        );
        Ok(Self { header, entries })
    }

    /// Decode an archive held in memory
    pub fn from_bytes(data: &[u8]) -> PacResult<Self> {
        Self::read_from(&mut Cursor::new(data))
    }

    /// Compute the layout the encoder would use
    pub fn layout(&self) -> PacResult<PacLayout> {
        PacLayout::compute(self)
    }

    /// Copy of this archive with `file_len` and every entry's pointer fields
    /// set to the values [`to_bytes`](Self::to_bytes) writes.
    ///
    /// Decoding the encoded form of an archive yields its relocated copy.
    pub fn relocated(&self) -> PacResult<Self> {
        let layout = self.layout()?;
        let entries = self
            .entries
            .iter()
            .zip(layout.records)
            .map(|(entry, record)| PacEntry {
                record,
                ..entry.clone()
            })
            .collect();
        Ok(Self {
            header: layout.header,
            entries,
        })
    }

    /// Encode the archive.
    ///
    /// Pointer fields and `file_len` are recomputed; `unused` and `unknown`
    /// are written verbatim. Layout is validated before the first byte is
    /// written.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> PacResult<()> {
        let layout = self.layout()?;
        layout.write(self, writer)
    }

    /// Encode the archive into a new buffer
    pub fn to_bytes(&self) -> PacResult<Vec<u8>> {
        let layout = self.layout()?;
        let mut output = Vec::with_capacity(layout.total_len() as usize);
        layout.write(self, &mut output)?;
        Ok(output)
    }

    /// First entry with the given filename
    pub fn find(&self, filename: &str) -> Option<&PacEntry> {
        self.entries.iter().find(|e| e.filename == filename)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the archive has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all payload sizes
    pub fn total_data_size(&self) -> u64 {
        self.entries.iter().map(|e| e.data.len() as u64).sum()
    }
}

impl crate::PacFormat for PacArchive {
    fn parse(data: &[u8]) -> PacResult<Self> {
        Self::from_bytes(data)
    }

    fn build(&self) -> PacResult<Vec<u8>> {
        self.to_bytes()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::PacFormat;
    use crate::test_utils::{PacFixture, test_round_trip};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pac_archive_round_trip() {
        let mut builder = PacBuilder::new();
        builder
            .add_file("a.txt", b"abc".to_vec())
            .add_entry(PacEntry::new("b.dat", vec![0xAA; 100]).with_unknown(0x1234));

        let archive = builder.into_archive().expect("Operation should succeed");
        test_round_trip(&archive).expect("Round trip should succeed");
    }

    #[test]
    fn test_concrete_single_entry_archive() {
        // header (24) + pad (8) + record (20) + pad (12) + "a.txt\0" + "xyz"
        let mut data = vec![
            0x61, 0x64, 0x64, 0x00, 0x04, 0x00, 0x00, 0x00, 0x20, 0x00, 0x00, 0x00, 0x20, 0x00,
            0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x49, 0x00, 0x00, 0x00,
        ];
        data.resize(32, 0);
        data.extend_from_slice(&70u32.to_le_bytes()); // data_ptr
        data.extend_from_slice(&3u32.to_le_bytes()); // data_len
        data.extend_from_slice(&0u32.to_le_bytes()); // unused
        data.extend_from_slice(&0u32.to_le_bytes()); // unknown
        data.extend_from_slice(&64u32.to_le_bytes()); // filename_ptr
        data.resize(64, 0);
        data.extend_from_slice(b"a.txt\0xyz");

        let archive = PacArchive::parse(&data).expect("Operation should succeed");

        assert_eq!(archive.header.index_ptr, 32);
        assert_eq!(archive.header.index_stride, 32);
        assert_eq!(archive.header.count, 1);
        assert_eq!(archive.header.file_len, 73);
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.entries[0].filename, "a.txt");
        assert_eq!(archive.entries[0].data, b"xyz");
        assert_eq!(archive.find("a.txt").map(PacEntry::size), Some(3));
        assert!(archive.find("missing").is_none());
    }

    #[test]
    fn test_decode_ignores_stream_position() {
        let data = PacFixture::new()
            .entry("one", b"1")
            .entry("two", b"22")
            .build();
        let mut cursor = Cursor::new(&data);
        cursor.set_position(40);

        let archive = PacArchive::read_from(&mut cursor).expect("Operation should succeed");
        assert_eq!(archive.entries[1].filename, "two");
    }

    #[test]
    fn test_zero_entries() {
        let data = PacFixture::new().build();
        let archive = PacArchive::parse(&data).expect("Operation should succeed");
        assert!(archive.is_empty());
        assert_eq!(archive.total_data_size(), 0);
    }

    #[test]
    fn test_bad_index_offset() {
        let mut data = PacFixture::new().entry("one", b"1").build();
        // count = 2, the second slot starts past the end
        data[16..20].copy_from_slice(&2u32.to_le_bytes());
        data[12..16].copy_from_slice(&0x1000u32.to_le_bytes());

        let err = PacArchive::parse(&data).unwrap_err();
        assert!(matches!(err, PacError::BadIndexOffset { index: 1, .. }));
    }

    #[test]
    fn test_zero_stride_aliases_one_record() {
        let mut data = PacFixture::new().entry("one", b"1").build();
        data[12..16].copy_from_slice(&0u32.to_le_bytes());
        data[16..20].copy_from_slice(&3u32.to_le_bytes());

        let archive = PacArchive::parse(&data).expect("Operation should succeed");
        assert_eq!(archive.len(), 3);
        assert!(archive.entries.iter().all(|e| e == &archive.entries[0]));
        assert_eq!(archive.total_data_size(), 3);
    }

    #[test]
    fn test_truncated_entry() {
        let data = PacFixture::new().entry("one", b"1").build();
        let err = PacArchive::parse(&data[..40]).unwrap_err();
        assert!(matches!(
            err,
            PacError::TruncatedEntry {
                index: 0,
                offset: 32
            }
        ));
    }

    #[test]
    fn test_header_error_propagates() {
        let mut data = PacFixture::new().entry("one", b"1").build();
        data[4] = 5;
        let err = PacArchive::parse(&data).unwrap_err();
        assert_eq!(err.kind(), PacErrorKind::UnsupportedVersion);
    }

    #[test]
    fn test_relocated_matches_decoded() {
        let archive = PacArchive::new(
            PacHeader::new(2),
            vec![
                PacEntry::new("x", b"first".to_vec()),
                PacEntry::new("y", b"second".to_vec()).with_unknown(3),
            ],
        );
        let decoded = PacArchive::from_bytes(&archive.to_bytes().expect("encode"))
            .expect("Operation should succeed");
        assert_eq!(decoded, archive.relocated().expect("Operation should succeed"));
    }

    #[test]
    fn test_archive_serialization() {
        let data = PacFixture::new().entry("one", b"1").build();
        let archive = PacArchive::parse(&data).expect("Operation should succeed");
        let json = serde_json::to_value(&archive).expect("Operation should succeed");

        assert_eq!(json["header"]["magic"], "add");
        assert_eq!(json["entries"][0]["filename"], "one");
        assert_eq!(json["entries"][0]["data_len"], 1);
    }
}
