//! Per-day snapshot of the Explore feed
//!
//! The first load for a date pages through the remote feed and writes the
//! whole record list to `<data_dir>/<YYYY-MM-DD>/features_res_photos.json`.
//! Later loads for the same date read that file and never touch the network.

use crate::error::{ExploreError, Result};
use chrono::NaiveDate;
use flickr_api::{FeedRecord, FlickrClient};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// File name of the per-day snapshot
pub const SNAPSHOT_FILE_NAME: &str = "features_res_photos.json";

/// Loads the feed for a date, from its snapshot when one exists
pub struct FeedCache {
    client: FlickrClient,
    data_dir: PathBuf,
    per_page: u32,
}

impl FeedCache {
    pub fn new(client: FlickrClient, data_dir: impl Into<PathBuf>, per_page: u32) -> Self {
        Self {
            client,
            data_dir: data_dir.into(),
            per_page,
        }
    }

    pub fn snapshot_path(&self, date: NaiveDate) -> PathBuf {
        self.data_dir
            .join(date.format("%Y-%m-%d").to_string())
            .join(SNAPSHOT_FILE_NAME)
    }

    /// All records for `date`, in page order
    ///
    /// A snapshot that fails to parse is treated like a missing one and
    /// replaced. Any other read error is fatal, as is any page failure; no
    /// snapshot is written unless every page succeeded.
    pub async fn load(&self, date: NaiveDate) -> Result<Vec<FeedRecord>> {
        let path = self.snapshot_path(date);

        match fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<Vec<FeedRecord>>(&bytes) {
                Ok(records) => {
                    info!(
                        path = ?path,
                        count = records.len(),
                        "Snapshot already exists; loaded featured photos without fetching"
                    );
                    return Ok(records);
                }
                Err(e) => {
                    warn!(path = ?path, error = %e, "Snapshot is corrupt; fetching again");
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = ?path, "Snapshot not found; fetching from Flickr");
            }
            Err(e) => {
                return Err(ExploreError::Snapshot {
                    path,
                    source: Box::new(e),
                })
            }
        }

        let records = self.fetch_all(date).await?;
        info!(date = %date, count = records.len(), "Fetched featured photos metadata");

        write_snapshot(&path, &records).await?;
        info!(path = ?path, "Saved snapshot");

        Ok(records)
    }

    /// Fetch page 1, then every remaining page concurrently
    async fn fetch_all(&self, date: NaiveDate) -> Result<Vec<FeedRecord>> {
        info!(date = %date, per_page = self.per_page, "Fetching interestingness feed");

        let first = self
            .client
            .interestingness_page(date, self.per_page, 1)
            .await
            .map_err(|e| ExploreError::FeedLoad {
                date,
                failures: vec![(1, e)],
            })?;

        let pages = first.pages.max(1);
        debug!(date = %date, pages, "Feed page count");

        let rest = futures::future::join_all((2..=pages).map(|page| async move {
            (
                page,
                self.client
                    .interestingness_page(date, self.per_page, page)
                    .await,
            )
        }))
        .await;

        let mut records = first.photo;
        let mut failures = Vec::new();
        // join_all keeps input order, so records stay in page order
        for (page, result) in rest {
            match result {
                Ok(feed_page) => records.extend(feed_page.photo),
                Err(e) => failures.push((page, e)),
            }
        }

        if !failures.is_empty() {
            return Err(ExploreError::FeedLoad { date, failures });
        }
        Ok(records)
    }
}

/// Write via a temp file and rename so the snapshot is whole or absent
async fn write_snapshot(path: &Path, records: &[FeedRecord]) -> Result<()> {
    let snapshot_err = |e: std::io::Error| ExploreError::Snapshot {
        path: path.to_path_buf(),
        source: Box::new(e),
    };

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).await.map_err(snapshot_err)?;
    }

    let json = serde_json::to_vec_pretty(records)?;
    let tmp = path.with_extension("json.tmp");

    if let Err(e) = fs::write(&tmp, json).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(snapshot_err(e));
    }
    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(snapshot_err(e));
    }
    Ok(())
}
