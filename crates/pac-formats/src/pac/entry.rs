//! PAC index records and resolved entries

use crate::pac::error::{PacError, PacResult};
use crate::pac::utils::{read_full, read_null_terminated_at};
use binrw::{BinRead, BinWrite};
use serde::Serialize;
use std::io::{Cursor, Read, Seek, SeekFrom};

/// Size of the fixed fields of one index record
pub const ENTRY_RECORD_SIZE: usize = 20;

/// Fixed fields of one index record (20 bytes, little-endian)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BinRead, BinWrite, Serialize)]
#[brw(little)]
pub struct EntryRecord {
    /// Absolute offset of the payload
    pub data_ptr: u32,
    /// Payload length in bytes
    pub data_len: u32,
    /// Always 0 in known archives; kept verbatim
    pub unused: u32,
    /// Purpose unknown; kept verbatim
    pub unknown: u32,
    /// Absolute offset of the NUL-terminated filename
    pub filename_ptr: u32,
}

impl EntryRecord {
    /// Read the record stored at `offset`
    pub(crate) fn read_at<R: Read + Seek>(
        reader: &mut R,
        index: usize,
        offset: u64,
    ) -> PacResult<Self> {
        reader.seek(SeekFrom::Start(offset))?;
        let mut buf = [0u8; ENTRY_RECORD_SIZE];
        if read_full(reader, &mut buf)? < ENTRY_RECORD_SIZE {
            return Err(PacError::TruncatedEntry { index, offset });
        }
        Ok(Self::read_le(&mut Cursor::new(&buf[..]))?)
    }

    /// Encode the record into its 20-byte form
    pub fn to_bytes(&self) -> PacResult<[u8; ENTRY_RECORD_SIZE]> {
        let mut out = [0u8; ENTRY_RECORD_SIZE];
        self.write_le(&mut Cursor::new(&mut out[..]))?;
        Ok(out)
    }
}

/// One archive entry: its index record plus the filename and payload the
/// record points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PacEntry {
    /// Index record as stored (pointers as found on decode)
    #[serde(flatten)]
    pub record: EntryRecord,
    /// Resolved from `filename_ptr`
    pub filename: String,
    /// Resolved from `data_ptr`/`data_len`
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl PacEntry {
    /// Create an entry for encoding
    ///
    /// `data_ptr`, `data_len` and `filename_ptr` are left at zero until
    /// layout assigns them; see [`PacArchive::relocated`](crate::pac::PacArchive::relocated).
    pub fn new<S: Into<String>>(filename: S, data: Vec<u8>) -> Self {
        Self {
            record: EntryRecord::default(),
            filename: filename.into(),
            data,
        }
    }

    /// Set the opaque `unknown` field
    pub fn with_unknown(mut self, unknown: u32) -> Self {
        self.record.unknown = unknown;
        self
    }

    /// Set the `unused` field
    pub fn with_unused(mut self, unused: u32) -> Self {
        self.record.unused = unused;
        self
    }

    /// Payload size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Resolve the record's pointers against the stream.
    ///
    /// `stream_len` bounds every read so a corrupt length cannot trigger a
    /// huge allocation. The reader is left at an unspecified position.
    pub(crate) fn resolve<R: Read + Seek>(
        reader: &mut R,
        record: EntryRecord,
        index: usize,
        stream_len: u64,
    ) -> PacResult<Self> {
        let name_ptr = u64::from(record.filename_ptr);
        if name_ptr >= stream_len {
            return Err(PacError::UnterminatedFilename {
                index,
                offset: name_ptr,
            });
        }
        let name_bytes = read_null_terminated_at(reader, name_ptr)?.ok_or(
            PacError::UnterminatedFilename {
                index,
                offset: name_ptr,
            },
        )?;
        let filename = String::from_utf8(name_bytes).map_err(|e| PacError::InvalidFilename {
            index,
            reason: e.to_string(),
        })?;

        let data_ptr = u64::from(record.data_ptr);
        let data_len = u64::from(record.data_len);
        let available = stream_len.saturating_sub(data_ptr);
        if data_len > available {
            return Err(PacError::TruncatedPayload {
                index,
                offset: data_ptr,
                expected: data_len,
                actual: available,
            });
        }

        reader.seek(SeekFrom::Start(data_ptr))?;
        let mut data = vec![0u8; record.data_len as usize];
        let read = read_full(reader, &mut data)?;
        if read < data.len() {
            return Err(PacError::TruncatedPayload {
                index,
                offset: data_ptr,
                expected: data_len,
                actual: read as u64,
            });
        }

        Ok(Self {
            record,
            filename,
            data,
        })
    }
}
