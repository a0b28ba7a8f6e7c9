//! `pac dump`: extract an archive into a directory

use crate::commands::read_archive;
use crate::error::DumpError;
use crate::layout::{
    EntryMetadata, HEADER_METADATA_FILENAME, HeaderMetadata, default_dump_dir, entry_filename,
    entry_metadata_filename, is_safe_filename,
};
use anyhow::{Context, Result};
use pac_formats::PacArchive;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Dump the archive at `path` into `out` (or the default directory).
///
/// Returns the directory written to.
pub fn handle(path: &Path, out: Option<&Path>) -> Result<PathBuf> {
    let out = match out {
        Some(dir) => dir.to_path_buf(),
        None => default_dump_dir(path)?,
    };

    let archive = read_archive(path)?;
    info!(
        "Dumping {} entries from {} to {}",
        archive.entries.len(),
        path.display(),
        out.display()
    );
    dump_archive(&archive, &out)?;
    Ok(out)
}

/// Write the header sidecar, then each entry's sidecar and payload.
///
/// Every filename is checked before anything is written.
pub fn dump_archive(archive: &PacArchive, out: &Path) -> Result<()> {
    for (index, entry) in archive.entries.iter().enumerate() {
        if !is_safe_filename(&entry.filename) {
            return Err(DumpError::UnsafeFilename {
                index,
                filename: entry.filename.clone(),
            }
            .into());
        }
    }

    println!("- {}", out.display());
    fs::create_dir_all(out).with_context(|| format!("failed to create {}", out.display()))?;

    let metadata = serde_json::to_string_pretty(&HeaderMetadata::from(&archive.header))?;
    write_file(&out.join(HEADER_METADATA_FILENAME), metadata.as_bytes())?;

    for (index, entry) in archive.entries.iter().enumerate() {
        let dump_name = entry_filename(index, &entry.filename);
        let data_path = out.join(&dump_name);
        let meta_path = out.join(entry_metadata_filename(&dump_name));

        println!("- {}", meta_path.display());
        let metadata = serde_json::to_string_pretty(&EntryMetadata::from(entry))?;
        write_file(&meta_path, metadata.as_bytes())?;

        println!("- {}", data_path.display());
        write_file(&data_path, &entry.data)?;
        debug!("entry {}: wrote {} bytes", index, entry.data.len());
    }

    Ok(())
}

fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data).with_context(|| format!("failed to write {}", path.display()))
}
