//! File-based store for featured images
//!
//! Every cached photo is a pair of sibling files sharing one filename stem:
//! `<stem>.json` with the feed record and `<stem>.<ext>` with the image bytes.
//! A lone sibling is debris; it is tolerated and eventually removed by the
//! eviction planner, which always picks the oldest logical items first.

mod error;
mod eviction;
mod filename;
mod store;

pub use error::{Result, StoreError};
pub use eviction::{EvictionGroup, EvictionPlan, FILES_PER_ITEM};
pub use filename::{escape_filename, item_stem};
pub use store::{list_by_modified, FileStore, ItemPaths, SaveOutcome, METADATA_EXT};
