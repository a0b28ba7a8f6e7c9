//! PAC layout computation and builder
//!
//! Encoded archives are laid out as:
//! - header at offset 0, zero-padded up to `index_ptr`
//! - `count` index records at `index_ptr + i * index_stride`, each zero-padded
//!   to the stride
//! - every filename in entry order, NUL-terminated
//! - every payload in entry order
//!
//! `file_len` is set to the total encoded size.

use crate::pac::entry::{ENTRY_RECORD_SIZE, EntryRecord, PacEntry};
use crate::pac::error::{PacError, PacResult};
use crate::pac::header::{
    DEFAULT_INDEX_PTR, DEFAULT_INDEX_STRIDE, HEADER_SIZE, PAC_MAGIC, PacHeader,
};
use crate::pac::PacArchive;
use std::io::Write;
use tracing::{debug, trace};

/// Header and index records computed for an archive before writing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacLayout {
    /// Header with `file_len` filled in
    pub header: PacHeader,
    /// One record per entry, with pointers assigned
    pub records: Vec<EntryRecord>,
    /// End of the index block (start of the filename block)
    pub index_end: u64,
}

impl PacLayout {
    /// Compute the on-disk layout of `archive`
    pub fn compute(archive: &PacArchive) -> PacResult<Self> {
        let header = &archive.header;
        let entries = &archive.entries;

        if header.count as usize != entries.len() {
            return Err(PacError::EntryCountMismatch {
                declared: header.count,
                actual: entries.len(),
            });
        }
        if (header.index_ptr as usize) < HEADER_SIZE {
            return Err(PacError::invalid_layout(format!(
                "index_ptr {} overlaps the {HEADER_SIZE}-byte header",
                header.index_ptr
            )));
        }
        if header.count > 1 && (header.index_stride as usize) < ENTRY_RECORD_SIZE {
            return Err(PacError::invalid_layout(format!(
                "index_stride {} is smaller than a {ENTRY_RECORD_SIZE}-byte record",
                header.index_stride
            )));
        }

        let index_end = if header.count == 0 {
            u64::from(header.index_ptr)
        } else {
            let last_end = header.record_offset(header.count - 1) + ENTRY_RECORD_SIZE as u64;
            last_end.max(header.record_offset(header.count))
        };

        let mut records: Vec<EntryRecord> = entries.iter().map(|e| e.record).collect();
        let mut cursor = index_end;

        for (index, entry) in entries.iter().enumerate() {
            if entry.filename.as_bytes().contains(&0) {
                return Err(PacError::InvalidFilename {
                    index,
                    reason: "contains a NUL byte".to_string(),
                });
            }
            records[index].filename_ptr = to_offset(cursor)?;
            cursor += entry.filename.len() as u64 + 1;
        }

        for (index, entry) in entries.iter().enumerate() {
            let length = entry.data.len() as u64;
            let data_len = payload_len(index, length)?;
            records[index].data_ptr = to_offset(cursor)?;
            records[index].data_len = data_len;
            cursor += length;
        }

        let file_len = to_offset(cursor)?;
        let header = PacHeader {
            magic: PAC_MAGIC,
            file_len,
            ..header.clone()
        };

        debug!(
            "PAC layout: {} entries, index {}..{}, total {} bytes",
            records.len(),
            header.index_ptr,
            index_end,
            file_len
        );

        Ok(Self {
            header,
            records,
            index_end,
        })
    }

    /// Total encoded size
    pub fn total_len(&self) -> u64 {
        u64::from(self.header.file_len)
    }

    /// Write `archive` according to this layout
    pub(crate) fn write<W: Write>(&self, archive: &PacArchive, writer: &mut W) -> PacResult<()> {
        let mut out = CountingWriter {
            inner: writer,
            written: 0,
        };

        self.header.write_to(&mut out)?;

        for (i, record) in self.records.iter().enumerate() {
            out.pad_to(self.header.record_offset(i as u32))?;
            out.write_all(&record.to_bytes()?)?;
        }
        out.pad_to(self.index_end)?;

        for entry in &archive.entries {
            out.write_all(entry.filename.as_bytes())?;
            out.write_all(&[0])?;
        }

        for (i, entry) in archive.entries.iter().enumerate() {
            trace!(
                "entry {}: {} ({} bytes) at {}",
                i,
                entry.filename,
                entry.data.len(),
                self.records[i].data_ptr
            );
            out.write_all(&entry.data)?;
        }

        debug_assert_eq!(out.written, self.total_len());
        Ok(())
    }
}

fn payload_len(index: usize, length: u64) -> PacResult<u32> {
    u32::try_from(length).map_err(|_| PacError::NonRepresentableLength { index, length })
}

fn to_offset(offset: u64) -> PacResult<u32> {
    u32::try_from(offset).map_err(|_| PacError::OffsetOverflow { offset })
}

/// Writer that tracks its position so gaps can be zero-filled
struct CountingWriter<'a, W: Write> {
    inner: &'a mut W,
    written: u64,
}

impl<W: Write> CountingWriter<'_, W> {
    fn pad_to(&mut self, offset: u64) -> std::io::Result<()> {
        const ZEROS: [u8; 64] = [0; 64];
        while self.written < offset {
            let n = (offset - self.written).min(ZEROS.len() as u64) as usize;
            self.write_all(&ZEROS[..n])?;
        }
        Ok(())
    }
}

impl<W: Write> Write for CountingWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

/// Builder for assembling a PAC archive from loose files
pub struct PacBuilder {
    index_ptr: u32,
    index_stride: u32,
    entries: Vec<PacEntry>,
}

impl Default for PacBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PacBuilder {
    /// Create new builder with the conventional index geometry
    pub fn new() -> Self {
        Self {
            index_ptr: DEFAULT_INDEX_PTR,
            index_stride: DEFAULT_INDEX_STRIDE,
            entries: Vec::new(),
        }
    }

    /// Set the index offset
    pub fn index_ptr(mut self, index_ptr: u32) -> Self {
        self.index_ptr = index_ptr;
        self
    }

    /// Set the index record size
    pub fn index_stride(mut self, index_stride: u32) -> Self {
        self.index_stride = index_stride;
        self
    }

    /// Add a file
    pub fn add_file<S: Into<String>>(&mut self, filename: S, data: Vec<u8>) -> &mut Self {
        self.entries.push(PacEntry::new(filename, data));
        self
    }

    /// Add a pre-built entry
    pub fn add_entry(&mut self, entry: PacEntry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    /// Get current number of entries
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Assemble the archive model, with pointers and `file_len` set to
    /// the values the encoder will write
    pub fn into_archive(self) -> PacResult<PacArchive> {
        let count = u32::try_from(self.entries.len()).map_err(|_| PacError::EntryCountMismatch {
            declared: u32::MAX,
            actual: self.entries.len(),
        })?;
        let header = PacHeader {
            index_ptr: self.index_ptr,
            index_stride: self.index_stride,
            ..PacHeader::new(count)
        };
        PacArchive::new(header, self.entries).relocated()
    }

    /// Build the archive as binary data
    pub fn build(self) -> PacResult<Vec<u8>> {
        self.into_archive()?.to_bytes()
    }
}
