//! `pac show`: print the decoded index of an archive

use crate::OutputFormat;
use crate::commands::read_archive;
use anyhow::Result;
use pac_formats::PacArchive;
use std::fmt::Write as _;
use std::path::Path;

/// Print the index of the archive at `path` to stdout
pub fn handle(path: &Path, format: OutputFormat) -> Result<()> {
    let archive = read_archive(path)?;
    print!("{}", render(&archive, format)?);
    Ok(())
}

/// Render an archive index in the requested format
pub fn render(archive: &PacArchive, format: OutputFormat) -> Result<String> {
    let out = match format {
        OutputFormat::Json => serde_json::to_string(archive)? + "\n",
        OutputFormat::JsonPretty => serde_json::to_string_pretty(archive)? + "\n",
        OutputFormat::Text => render_text(archive)?,
    };
    Ok(out)
}

fn render_text(archive: &PacArchive) -> Result<String, std::fmt::Error> {
    let h = &archive.header;
    let mut out = String::new();

    writeln!(out, "magic:        {}", h.magic_str())?;
    writeln!(out, "version:      {}", h.version)?;
    writeln!(out, "index_ptr:    {}", h.index_ptr)?;
    writeln!(out, "index_stride: {}", h.index_stride)?;
    writeln!(out, "count:        {}", h.count)?;
    writeln!(out, "file_len:     {}", h.file_len)?;
    writeln!(out, "entries:")?;

    for (i, entry) in archive.entries.iter().enumerate() {
        let r = &entry.record;
        writeln!(
            out,
            "  {i:03} {name:<32} data_ptr={:<10} data_len={:<10} unused={} unknown={:#010x} filename_ptr={}",
            r.data_ptr,
            r.data_len,
            r.unused,
            r.unknown,
            r.filename_ptr,
            name = entry.filename,
        )?;
    }
    Ok(out)
}
