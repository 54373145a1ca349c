//! Featured-image refresh
//!
//! One run loads the day's feed, picks a random subset, downloads and stores
//! each pick concurrently, and evicts the oldest stored items so the folder
//! stays within its retention limit.
//!
//! Eviction is planned from a single listing taken before any new file is
//! written. Each fully stored new item then releases exactly one planned
//! deletion group, oldest first, and whatever is left is drained once every
//! download has finished. New files therefore never end up in the plan, and
//! the folder never holds more than the retained items plus the ones in
//! flight.

use crate::error::Result;
use crate::feed::FeedCache;
use crate::select::select_subset;
use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use explore_store::{item_stem, EvictionGroup, EvictionPlan, FileStore, ItemPaths};
use flickr_api::{FeedRecord, FlickrClient, ImageSize};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Plain values the refresh needs; loading them is the caller's job
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Parent of the per-day snapshot directories
    pub data_dir: PathBuf,
    /// Folder holding the cached images
    pub out_dir: PathBuf,
    /// Most new images added per run
    pub new_image_limit: usize,
    /// Most pre-existing images kept after a run
    pub old_image_limit: usize,
    pub image_size: ImageSize,
    /// Feed page size
    pub per_page: u32,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            out_dir: PathBuf::from("data/out"),
            new_image_limit: 5,
            old_image_limit: 5,
            image_size: ImageSize::Biggest,
            per_page: 100,
        }
    }
}

/// Summary of one refresh
#[derive(Debug, Clone, Serialize)]
pub struct RefreshReport {
    pub date: NaiveDate,
    pub feed_records: usize,
    pub selected: usize,
    pub persisted: usize,
    pub fetch_failures: usize,
    pub persist_failures: usize,
    pub evicted_items: usize,
    pub delete_failures: usize,
    pub new_files: Vec<PathBuf>,
}

impl RefreshReport {
    fn new(date: NaiveDate, feed_records: usize, selected: usize) -> Self {
        Self {
            date,
            feed_records,
            selected,
            persisted: 0,
            fetch_failures: 0,
            persist_failures: 0,
            evicted_items: 0,
            delete_failures: 0,
            new_files: Vec::new(),
        }
    }
}

enum ItemOutcome {
    Persisted(ItemPaths),
    FetchFailed,
    PersistFailed,
}

/// Latest complete Explore day: yesterday in UTC
pub fn latest_explore_date(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive() - Days::new(1)
}

/// Human-facing Explore page for `date`
pub fn explore_page_url(date: NaiveDate) -> String {
    format!(
        "https://flickr.com/explore/{}/{}/{}",
        date.year(),
        date.month(),
        date.day()
    )
}

pub struct RefreshPipeline {
    config: RefreshConfig,
    client: FlickrClient,
    feed: FeedCache,
    store: FileStore,
}

impl RefreshPipeline {
    pub fn new(client: FlickrClient, config: RefreshConfig) -> Self {
        let feed = FeedCache::new(client.clone(), &config.data_dir, config.per_page);
        let store = FileStore::new(&config.out_dir);
        Self {
            config,
            client,
            feed,
            store,
        }
    }

    /// Refresh from the latest complete Explore day
    pub async fn run_latest(&self) -> Result<RefreshReport> {
        self.run(latest_explore_date(Utc::now())).await
    }

    /// Refresh from the Explore feed of `date`
    ///
    /// Only a feed load failure is an error. Failed downloads, failed writes
    /// and failed deletes are logged and counted in the report.
    pub async fn run(&self, date: NaiveDate) -> Result<RefreshReport> {
        info!(date = %date, page = %explore_page_url(date), "Refreshing from Explore");
        self.store.init().await?;

        let records = self.feed.load(date).await?;
        let feed_records = records.len();

        let selected = {
            let mut rng = rand::rng();
            select_subset(records, self.config.new_image_limit, &mut rng)
        };
        info!(count = selected.len(), "Fetching new images from Flickr");

        // A reselected record overwrites its stored copy, so those files are
        // new items for this run and must stay out of the plan
        let fresh_stems: HashSet<String> = selected
            .iter()
            .map(|record| item_stem(&record.id, &record.title))
            .collect();
        let (refreshed, old_files): (Vec<PathBuf>, Vec<PathBuf>) =
            self.store.list().await.into_iter().partition(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .is_some_and(|stem| fresh_stems.contains(stem))
            });
        if !refreshed.is_empty() {
            info!(files = ?refreshed, "Reselected items will be overwritten, not evicted");
        }
        debug!(files = ?old_files, "Old files");
        let mut plan = EvictionPlan::compute(&old_files, self.config.old_image_limit);
        info!(
            items = plan.len(),
            files = plan.paths().len(),
            out_dir = ?self.config.out_dir,
            "Planned eviction"
        );

        let mut report = RefreshReport::new(date, feed_records, selected.len());

        let mut tasks: FuturesUnordered<_> = selected
            .iter()
            .map(|record| self.fetch_and_persist(record))
            .collect();

        while let Some(outcome) = tasks.next().await {
            match outcome {
                ItemOutcome::Persisted(item) => {
                    report.persisted += 1;
                    report.new_files.push(item.metadata);
                    report.new_files.push(item.data);
                    if let Some(group) = plan.next_group() {
                        self.evict(group, &mut report).await;
                    }
                }
                ItemOutcome::FetchFailed => report.fetch_failures += 1,
                ItemOutcome::PersistFailed => report.persist_failures += 1,
            }
        }

        if !plan.is_empty() {
            info!(
                remaining = plan.len(),
                new_image_limit = self.config.new_image_limit,
                old_image_limit = self.config.old_image_limit,
                "Deletes needed beyond new images to not exceed old image limit"
            );
            while let Some(group) = plan.next_group() {
                self.evict(group, &mut report).await;
            }
        }

        info!(
            date = %report.date,
            persisted = report.persisted,
            fetch_failures = report.fetch_failures,
            persist_failures = report.persist_failures,
            evicted = report.evicted_items,
            out_dir = ?self.config.out_dir,
            "Finished featured images update"
        );
        debug!(new_files = ?report.new_files, "New files");

        Ok(report)
    }

    async fn fetch_and_persist(&self, record: &FeedRecord) -> ItemOutcome {
        let payload = match self.client.fetch_image(record, self.config.image_size).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(id = %record.id, title = %record.title, error = %e, "Skip missing image data");
                return ItemOutcome::FetchFailed;
            }
        };

        // Only a real original keeps its own extension
        let use_generated_ext =
            self.config.image_size != ImageSize::Original || record.original_secret.is_none();

        let outcome = self.store.save(record, &payload, use_generated_ext).await;
        match outcome.into_item() {
            Ok(item) => ItemOutcome::Persisted(item),
            Err(e) => {
                warn!(title = %record.title, error = %e, "Skip failed write");
                ItemOutcome::PersistFailed
            }
        }
    }

    async fn evict(&self, group: EvictionGroup, report: &mut RefreshReport) {
        for path in &group.paths {
            match self.store.delete(path).await {
                Ok(()) => debug!(path = ?path, "Evicted file"),
                Err(e) => {
                    warn!(path = ?path, error = %e, "Failed to delete planned file");
                    report.delete_failures += 1;
                }
            }
        }
        report.evicted_items += 1;
    }
}
