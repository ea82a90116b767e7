use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::game::Game;

const CACHE_DIR: &str = "courtside";
const ARCHIVE_FILE: &str = "completed_games.json";
const ARCHIVE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct ArchiveFile {
    version: u32,
    games: Vec<Game>,
}

/// Reads the archive. `Ok(None)` when no archive exists yet; an unreadable file or
/// one written by another archive version is an error.
pub fn read_archive(path: &Path) -> Result<Option<Vec<Game>>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err).with_context(|| format!("read {}", path.display())),
    };
    let archive: ArchiveFile = serde_json::from_str(&raw)
        .with_context(|| format!("parse archive {}", path.display()))?;
    if archive.version != ARCHIVE_VERSION {
        bail!(
            "archive {} has version {}, expected {ARCHIVE_VERSION}",
            path.display(),
            archive.version
        );
    }
    Ok(Some(archive.games))
}

/// Loads archived games for reporting; a missing or unreadable file yields nothing.
pub fn load_archive(path: &Path) -> Vec<Game> {
    match read_archive(path) {
        Ok(games) => games.unwrap_or_default(),
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "archive unreadable, ignoring");
            Vec::new()
        }
    }
}

/// Appends completed games to the archive, skipping ids already stored.
///
/// An archive that cannot be read is moved aside to a timestamped `.bak` file
/// before the new one is written, so its bytes are never overwritten.
pub fn append_to_archive(path: &Path, games: &[Game]) -> Result<usize> {
    let mut stored = match read_archive(path) {
        Ok(stored) => stored.unwrap_or_default(),
        Err(err) => {
            let backup = backup_path(path);
            fs::rename(path, &backup).with_context(|| {
                format!("move unreadable archive aside to {}", backup.display())
            })?;
            tracing::warn!(
                error = %format!("{err:#}"),
                backup = %backup.display(),
                "unreadable archive moved aside"
            );
            Vec::new()
        }
    };
    let mut added = 0;
    for game in games.iter().filter(|g| g.is_completed) {
        if stored.iter().any(|g| g.id == game.id) {
            continue;
        }
        stored.push(game.clone());
        added += 1;
    }
    if added == 0 {
        return Ok(0);
    }

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let archive = ArchiveFile {
        version: ARCHIVE_VERSION,
        games: stored,
    };
    let json = serde_json::to_string(&archive).context("serialize archive")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).context("write archive")?;
    fs::rename(&tmp, path).context("swap archive")?;
    Ok(added)
}

fn backup_path(path: &Path) -> PathBuf {
    let stamp = Utc::now().format("%Y%m%d%H%M%S%3f");
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| ARCHIVE_FILE.to_string());
    path.with_file_name(format!("{name}.{stamp}.bak"))
}

pub fn archive_path() -> Option<PathBuf> {
    // Prefer XDG cache.
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR).join(ARCHIVE_FILE));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join(CACHE_DIR)
            .join(ARCHIVE_FILE),
    )
}
