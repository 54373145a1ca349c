//! Oldest-first eviction planning

use std::collections::VecDeque;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Files that make up one complete logical item
pub const FILES_PER_ITEM: usize = 2;

/// Files belonging to one logical item, scheduled for deletion together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvictionGroup {
    pub stem: OsString,
    pub paths: Vec<PathBuf>,
}

impl EvictionGroup {
    /// Whether the sibling file was found
    pub fn is_complete(&self) -> bool {
        self.paths.len() == FILES_PER_ITEM
    }
}

/// Deletion groups ordered from oldest to newest item
///
/// Computed once from a single directory listing and then consumed one group
/// at a time; it never touches the filesystem itself.
#[derive(Debug, Clone, Default)]
pub struct EvictionPlan {
    groups: VecDeque<EvictionGroup>,
}

impl EvictionPlan {
    /// Plan deletions so at most `retain` logical items remain
    ///
    /// `files` must be sorted by modification time, oldest first. The item
    /// count is `files.len() / FILES_PER_ITEM`, so a stray lone file does not
    /// count as half an item. Each group starts with the oldest remaining
    /// file and pulls in its sibling wherever it sits in the listing, so the
    /// item whose older file is oldest always goes first.
    pub fn compute(files: &[PathBuf], retain: usize) -> Self {
        let item_count = files.len() / FILES_PER_ITEM;
        let target = item_count.saturating_sub(retain);
        debug!(files = files.len(), item_count, retain, target, "Planning eviction");

        let mut remaining: VecDeque<&PathBuf> = files.iter().collect();
        let mut groups = VecDeque::with_capacity(target);

        while groups.len() < target {
            let Some(oldest) = remaining.pop_front() else {
                break;
            };
            let stem = stem_of(oldest);
            let mut paths = vec![oldest.clone()];

            if let Some(idx) = remaining.iter().position(|p| stem_of(p) == stem) {
                if let Some(sibling) = remaining.remove(idx) {
                    paths.push(sibling.clone());
                }
            } else {
                warn!(path = ?oldest, "Unable to find sibling file; evicting lone file");
            }

            groups.push_back(EvictionGroup { stem, paths });
        }

        Self { groups }
    }

    /// Number of pending groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Take the oldest pending group
    pub fn next_group(&mut self) -> Option<EvictionGroup> {
        self.groups.pop_front()
    }

    pub fn groups(&self) -> impl Iterator<Item = &EvictionGroup> {
        self.groups.iter()
    }

    /// All planned paths in deletion order
    pub fn paths(&self) -> Vec<PathBuf> {
        self.groups
            .iter()
            .flat_map(|g| g.paths.iter().cloned())
            .collect()
    }
}

fn stem_of(path: &Path) -> OsString {
    path.file_stem().map(OsString::from).unwrap_or_default()
}
