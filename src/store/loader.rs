//! Snapshot loading and saving.
//!
//! A snapshot file holds either a JSON array of photos or an object that
//! groups photo arrays by category key. A snapshot directory is walked
//! recursively; every `*.json` file in it holds one photo document or an
//! array of photos.

use super::snapshot::PhotoSnapshot;
use super::StoreError;
use crate::models::Photo;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Where a snapshot came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotSource {
    File(PathBuf),
    Directory(PathBuf),
}

impl SnapshotSource {
    pub fn path(&self) -> &Path {
        match self {
            SnapshotSource::File(path) | SnapshotSource::Directory(path) => path,
        }
    }
}

/// A snapshot together with its origin.
#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    pub source: SnapshotSource,
    pub snapshot: PhotoSnapshot,
}

/// Load a snapshot from a JSON file or a directory of JSON documents.
pub async fn load_snapshot(path: &Path) -> Result<LoadedSnapshot, StoreError> {
    let metadata = tokio::fs::metadata(path).await.map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            StoreError::NotFound(path.to_path_buf())
        } else {
            StoreError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let (source, photos) = if metadata.is_dir() {
        let photos = load_directory(path).await?;
        (SnapshotSource::Directory(path.to_path_buf()), photos)
    } else {
        let content = read_file(path).await?;
        let photos = parse_snapshot_document(&content, path)?;
        (SnapshotSource::File(path.to_path_buf()), photos)
    };

    info!("Loaded {} photos from {}", photos.len(), path.display());

    Ok(LoadedSnapshot {
        source,
        snapshot: PhotoSnapshot::from_photos(photos),
    })
}

/// Write a file snapshot back to disk as a JSON array of photos.
///
/// Grouped snapshot files are rewritten in the array form. Directory
/// snapshots cannot be saved.
pub async fn save_snapshot(loaded: &LoadedSnapshot) -> Result<(), StoreError> {
    let path = match &loaded.source {
        SnapshotSource::File(path) => path,
        SnapshotSource::Directory(path) => return Err(StoreError::ReadOnlySource(path.clone())),
    };

    let mut content =
        serde_json::to_string_pretty(loaded.snapshot.photos()).map_err(StoreError::Encode)?;
    content.push('\n');

    tokio::fs::write(path, content)
        .await
        .map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

    info!("Saved {} photos to {}", loaded.snapshot.len(), path.display());
    Ok(())
}

/// Parse one snapshot document.
///
/// Accepts an array of photos, a single photo object (recognized by its
/// `id` field) or an object mapping category keys to photo arrays. In the
/// grouped form the key fills in `category` for photos that omit it.
pub fn parse_snapshot_document(content: &str, origin: &Path) -> Result<Vec<Photo>, StoreError> {
    let parse_error = |source: serde_json::Error| StoreError::Parse {
        path: origin.to_path_buf(),
        source,
    };

    let value: Value = serde_json::from_str(content).map_err(parse_error)?;

    match value {
        Value::Object(fields) if fields.contains_key("id") => {
            let photo: Photo =
                serde_json::from_value(Value::Object(fields)).map_err(parse_error)?;
            Ok(vec![photo])
        }
        Value::Object(groups) => {
            let mut photos = Vec::new();

            for (category, entries) in groups {
                let Value::Array(entries) = entries else {
                    warn!(
                        "Ignoring non-array entry '{}' in {}",
                        category,
                        origin.display()
                    );
                    continue;
                };

                for mut entry in entries {
                    if let Value::Object(ref mut fields) = entry {
                        fields
                            .entry("category")
                            .or_insert_with(|| Value::String(category.clone()));
                    }
                    photos.push(serde_json::from_value(entry).map_err(parse_error)?);
                }
            }

            Ok(photos)
        }
        // Arrays parse directly; anything else fails with serde's message
        other => serde_json::from_value(other).map_err(parse_error),
    }
}

async fn load_directory(dir: &Path) -> Result<Vec<Photo>, StoreError> {
    let mut photos = Vec::new();

    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_json(entry.path()) {
            continue;
        }

        let content = read_file(entry.path()).await?;
        let document = parse_snapshot_document(&content, entry.path())?;
        debug!(
            "Read {} photos from {}",
            document.len(),
            entry.path().display()
        );
        photos.extend(document);
    }

    Ok(photos)
}

async fn read_file(path: &Path) -> Result<String, StoreError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
