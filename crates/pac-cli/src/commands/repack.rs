//! `pac repack`: rebuild an archive from a dump directory

use crate::layout::{
    EntryMetadata, HEADER_METADATA_FILENAME, HeaderMetadata, default_repack_path,
    entry_metadata_filename, order_dump_files,
};
use anyhow::{Context, Result, anyhow};
use pac_formats::{PacArchive, PacBuilder, PacEntry};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Repack the dump in `dir` into `out` (or the default path).
///
/// Returns the archive path written to.
pub fn handle(dir: &Path, out: Option<&Path>) -> Result<PathBuf> {
    let out = match out {
        Some(file) => file.to_path_buf(),
        None => default_repack_path(dir)?,
    };

    let archive = load_dump(dir)?;
    info!(
        "Repacking {} entries from {} to {}",
        archive.entries.len(),
        dir.display(),
        out.display()
    );

    let data = archive
        .to_bytes()
        .with_context(|| format!("failed to encode {}", out.display()))?;
    fs::write(&out, &data).with_context(|| format!("failed to write {}", out.display()))?;
    println!("- {}", out.display());
    Ok(out)
}

/// Assemble an archive model from a dump directory
pub fn load_dump(dir: &Path) -> Result<PacArchive> {
    let mut names = Vec::new();
    for dirent in fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))? {
        let dirent = dirent?;
        if !dirent.file_type()?.is_file() {
            continue;
        }
        let name = dirent
            .file_name()
            .into_string()
            .map_err(|name| anyhow!("non UTF-8 file name in dump: {}", name.to_string_lossy()))?;
        names.push(name);
    }

    let header_path = dir.join(HEADER_METADATA_FILENAME);
    let header: HeaderMetadata = if header_path.exists() {
        read_json(&header_path)?
    } else {
        debug!("No {} in dump, using defaults", HEADER_METADATA_FILENAME);
        HeaderMetadata::default()
    };

    let mut builder = PacBuilder::new()
        .index_ptr(header.index_ptr)
        .index_stride(header.index_stride);

    for file in order_dump_files(names)? {
        let data_path = dir.join(&file.dump_name);
        let data = fs::read(&data_path)
            .with_context(|| format!("failed to read {}", data_path.display()))?;

        let meta_path = dir.join(entry_metadata_filename(&file.dump_name));
        let meta: EntryMetadata = if meta_path.exists() {
            read_json(&meta_path)?
        } else {
            EntryMetadata::default()
        };

        debug!(
            "entry {}: {} ({} bytes)",
            file.sequence,
            file.filename,
            data.len()
        );
        builder.add_entry(
            PacEntry::new(file.filename, data)
                .with_unknown(meta.unknown)
                .with_unused(meta.unused),
        );
    }

    Ok(builder.into_archive()?)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("invalid JSON in {}", path.display()))
}
