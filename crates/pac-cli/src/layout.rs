//! Naming conventions for directory dumps.
//!
//! A dump directory holds:
//! - `_metadata.json` with the archive's index geometry
//! - `NNN_filename`, the payload of entry NNN
//! - `NNN_filename.json`, that entry's index fields

use crate::error::DumpError;
use pac_formats::pac::{DEFAULT_INDEX_PTR, DEFAULT_INDEX_STRIDE, PacEntry, PacHeader};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Filename for dumped header data
pub const HEADER_METADATA_FILENAME: &str = "_metadata.json";

/// Suffix for dumped entry metadata
pub const ENTRY_METADATA_SUFFIX: &str = ".json";

/// Archive extension
pub const PAC_EXTENSION: &str = "pac";

/// Header fields that survive a dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderMetadata {
    /// Offset of the index
    pub index_ptr: u32,
    /// Index record size
    pub index_stride: u32,
}

impl Default for HeaderMetadata {
    fn default() -> Self {
        Self {
            index_ptr: DEFAULT_INDEX_PTR,
            index_stride: DEFAULT_INDEX_STRIDE,
        }
    }
}

impl From<&PacHeader> for HeaderMetadata {
    fn from(header: &PacHeader) -> Self {
        Self {
            index_ptr: header.index_ptr,
            index_stride: header.index_stride,
        }
    }
}

/// Entry fields that cannot be recovered from the dumped file itself
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMetadata {
    /// Opaque `unknown` field
    pub unknown: u32,
    /// `unused` field, normally 0
    #[serde(default)]
    pub unused: u32,
}

impl From<&PacEntry> for EntryMetadata {
    fn from(entry: &PacEntry) -> Self {
        Self {
            unknown: entry.record.unknown,
            unused: entry.record.unused,
        }
    }
}

/// A payload file found in a dump directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpFile {
    /// Sequence number from the `NNN_` prefix
    pub sequence: u32,
    /// Filename to store in the archive
    pub filename: String,
    /// Name of the file inside the dump directory
    pub dump_name: String,
}

/// Dumped filename for the `index`-th entry
pub fn entry_filename(index: usize, filename: &str) -> String {
    format!("{index:03}_{filename}")
}

/// Sidecar filename for a dumped entry
pub fn entry_metadata_filename(dump_name: &str) -> String {
    format!("{dump_name}{ENTRY_METADATA_SUFFIX}")
}

/// Split a dumped filename into its sequence number and archive filename
pub fn parse_entry_filename(dump_name: &str) -> Result<(u32, &str), DumpError> {
    let (prefix, filename) = dump_name
        .split_once('_')
        .ok_or_else(|| DumpError::BadEntryName(dump_name.to_string()))?;
    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DumpError::BadEntryName(dump_name.to_string()));
    }
    let sequence = prefix
        .parse()
        .map_err(|_| DumpError::BadEntryName(dump_name.to_string()))?;
    Ok((sequence, filename))
}

/// Whether an archive filename can be written as a single path component
pub fn is_safe_filename(filename: &str) -> bool {
    !filename.contains(['/', '\\']) && filename != "." && filename != ".."
}

/// Pick the payload files out of a dump listing, ordered by sequence number.
///
/// The header sidecar is skipped, as is any `X.json` for which `X` is also
/// listed; a payload whose own name ends in `.json` is kept.
pub fn order_dump_files<I>(names: I) -> Result<Vec<DumpFile>, DumpError>
where
    I: IntoIterator<Item = String>,
{
    let names: BTreeSet<String> = names.into_iter().collect();
    let mut by_sequence: BTreeMap<u32, DumpFile> = BTreeMap::new();

    for dump_name in &names {
        let is_sidecar = dump_name
            .strip_suffix(ENTRY_METADATA_SUFFIX)
            .is_some_and(|payload| names.contains(payload));
        if dump_name == HEADER_METADATA_FILENAME || is_sidecar {
            continue;
        }
        let (sequence, filename) = parse_entry_filename(dump_name)?;
        let file = DumpFile {
            sequence,
            filename: filename.to_string(),
            dump_name: dump_name.clone(),
        };
        if let Some(existing) = by_sequence.insert(sequence, file) {
            return Err(DumpError::DuplicateSequence {
                sequence,
                first: existing.dump_name,
                second: dump_name.clone(),
            });
        }
    }

    Ok(by_sequence.into_values().collect())
}

/// Default dump directory for an archive: its base name, minus `.pac`
pub fn default_dump_dir(archive: &Path) -> Result<PathBuf, DumpError> {
    let name = archive
        .file_name()
        .ok_or_else(|| DumpError::NoDefaultName(archive.to_path_buf()))?;

    let is_pac = archive
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PAC_EXTENSION));
    match archive.file_stem() {
        Some(stem) if is_pac => Ok(PathBuf::from(stem)),
        // keep the dump from colliding with the archive itself
        _ => {
            let mut dir = name.to_os_string();
            dir.push("_dump");
            Ok(PathBuf::from(dir))
        }
    }
}

/// Default archive path for a dump directory: its name plus `.pac`
pub fn default_repack_path(dir: &Path) -> Result<PathBuf, DumpError> {
    let name = dir
        .file_name()
        .ok_or_else(|| DumpError::NoDefaultName(dir.to_path_buf()))?;
    let mut file = name.to_os_string();
    file.push(".");
    file.push(PAC_EXTENSION);
    Ok(PathBuf::from(file))
}
