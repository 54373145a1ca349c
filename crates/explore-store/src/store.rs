//! Two-file-per-item storage in the output directory

use crate::error::{Result, StoreError};
use crate::filename::item_stem;
use flickr_api::{FeedRecord, GENERATED_IMAGE_EXT};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tracing::{debug, info, warn};

/// Extension of the metadata sibling
pub const METADATA_EXT: &str = "json";

/// Paths of both files of one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPaths {
    pub metadata: PathBuf,
    pub data: PathBuf,
}

/// Result of writing both files of one item
///
/// The two writes succeed or fail independently. When exactly one fails the
/// other file stays on disk as debris.
#[derive(Debug)]
pub struct SaveOutcome {
    pub metadata: Result<PathBuf>,
    pub data: Result<PathBuf>,
}

impl SaveOutcome {
    pub fn is_complete(&self) -> bool {
        self.metadata.is_ok() && self.data.is_ok()
    }

    /// Both paths, or the first write error
    pub fn into_item(self) -> Result<ItemPaths> {
        Ok(ItemPaths {
            metadata: self.metadata?,
            data: self.data?,
        })
    }
}

/// Output directory holding the cached items
#[derive(Debug, Clone)]
pub struct FileStore {
    out_dir: PathBuf,
}

impl FileStore {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Ensure the output directory exists
    pub async fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.out_dir)
            .await
            .map_err(|e| StoreError::io(&self.out_dir, e))?;
        info!(out_dir = ?self.out_dir, "Output directory ready");
        Ok(())
    }

    /// Where `record` is stored
    ///
    /// The image keeps the record's original format only when the caller
    /// fetched the original size and the record names a format.
    pub fn item_paths(&self, record: &FeedRecord, use_generated_ext: bool) -> ItemPaths {
        let stem = item_stem(&record.id, &record.title);
        let ext = match (&record.original_format, use_generated_ext) {
            (Some(format), false) => format.as_str(),
            _ => GENERATED_IMAGE_EXT,
        };

        ItemPaths {
            metadata: self.out_dir.join(format!("{}.{}", stem, METADATA_EXT)),
            data: self.out_dir.join(format!("{}.{}", stem, ext)),
        }
    }

    /// Write the metadata and image files for `record`
    pub async fn save(
        &self,
        record: &FeedRecord,
        payload: &[u8],
        use_generated_ext: bool,
    ) -> SaveOutcome {
        let paths = self.item_paths(record, use_generated_ext);

        let write_metadata = async {
            let json = serde_json::to_vec_pretty(record)?;
            fs::write(&paths.metadata, json)
                .await
                .map_err(|e| StoreError::io(&paths.metadata, e))?;
            info!(title = %record.title, path = ?paths.metadata, "Saved metadata");
            Ok::<_, StoreError>(paths.metadata.clone())
        };

        let write_data = async {
            fs::write(&paths.data, payload)
                .await
                .map_err(|e| StoreError::io(&paths.data, e))?;
            info!(title = %record.title, path = ?paths.data, "Saved image");
            Ok::<_, StoreError>(paths.data.clone())
        };

        let (metadata, data) = tokio::join!(write_metadata, write_data);
        SaveOutcome { metadata, data }
    }

    /// Files in the output directory, oldest first
    pub async fn list(&self) -> Vec<PathBuf> {
        list_by_modified(&self.out_dir).await
    }

    /// Remove one file
    pub async fn delete(&self, path: &Path) -> Result<()> {
        fs::remove_file(path)
            .await
            .map_err(|e| StoreError::io(path, e))?;
        debug!(path = ?path, "Deleted file");
        Ok(())
    }
}

/// Regular files in `dir` sorted by modification time, ascending
///
/// A missing or unreadable directory is an empty listing, including one that
/// fails partway through the scan; a partial listing would undercount old
/// items. Ties are broken by path so the order is stable.
pub async fn list_by_modified(dir: &Path) -> Vec<PathBuf> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = ?dir, error = %e, "Failed to list files; assume directory is empty");
            return Vec::new();
        }
    };

    let mut files: Vec<(SystemTime, PathBuf)> = Vec::new();
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                warn!(dir = ?dir, error = %e, "Failed to list files; assume directory is empty");
                return Vec::new();
            }
        };

        let path = entry.path();
        match entry.metadata().await {
            Ok(meta) if meta.is_file() => {
                let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                files.push((modified, path));
            }
            Ok(_) => {}
            Err(e) => warn!(path = ?path, error = %e, "Failed to stat file; skipping"),
        }
    }

    files.sort();
    files.into_iter().map(|(_, path)| path).collect()
}
