//! JSON export of the clip album, read and written as a whole.

use std::path::Path;

use anyhow::{Context, Result};
use clip_grouping::{InMemoryLibrary, MediaRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct LibraryExport {
    clips: Vec<MediaRecord>,
}

pub fn load_library(path: &Path) -> Result<InMemoryLibrary> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read library export: {}", path.display()))?;
    let export: LibraryExport = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse library export: {}", path.display()))?;
    tracing::info!(clips = export.clips.len(), path = %path.display(), "loaded library");
    Ok(InMemoryLibrary::new(export.clips))
}

/// Write the library back out, consuming it
pub fn save_library(path: &Path, library: InMemoryLibrary) -> Result<()> {
    let export = LibraryExport {
        clips: library.into_records(),
    };
    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize library export")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write library export: {}", path.display()))
}
