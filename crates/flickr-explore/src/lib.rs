//! Flickr Explore featured-image cache
//!
//! Loads a day's Explore feed (once per day, then from a local snapshot),
//! downloads a random handful of its photos next to their metadata, and
//! evicts the oldest stored photos to keep the folder bounded.

pub mod config;
pub mod error;
pub mod feed;
pub mod pipeline;
pub mod select;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::{ExploreError, Result};
pub use feed::{FeedCache, SNAPSHOT_FILE_NAME};
pub use pipeline::{
    explore_page_url, latest_explore_date, RefreshConfig, RefreshPipeline, RefreshReport,
};
pub use select::{select_subset, shuffle};
