//! Command handlers for the `pac` binary

pub mod dump;
pub mod repack;
pub mod show;

use crate::{Commands, OutputFormat};
use anyhow::Result;

/// Run one subcommand
pub fn handle(cmd: Commands, format: OutputFormat) -> Result<()> {
    match cmd {
        Commands::Show { file } => show::handle(&file, format),
        Commands::Dump { file, out } => dump::handle(&file, out.as_deref()).map(|_| ()),
        Commands::Repack { dir, out } => repack::handle(&dir, out.as_deref()).map(|_| ()),
    }
}

/// Open and decode an archive from disk
pub(crate) fn read_archive(path: &std::path::Path) -> Result<pac_formats::PacArchive> {
    use anyhow::Context;

    let mut file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let archive = pac_formats::PacArchive::read_from(&mut file)
        .with_context(|| format!("failed to decode {}", path.display()))?;
    Ok(archive)
}
