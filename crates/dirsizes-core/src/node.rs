//! Per-directory statistics record.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Aggregate statistics for one directory.
///
/// While a tree is being built the counters hold the directory's direct
/// contribution only; once the tree is finished they include every
/// descendant as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirNode {
    /// Directory path, unique within a tree.
    pub path: PathBuf,
    /// Number of regular files counted.
    pub file_count: u64,
    /// Size in bytes of the counted files.
    pub size: u64,
    /// Distance from the scan root (root = 0).
    pub depth: u32,
    /// Subdirectories that could not be listed.
    pub err_dir_count: u64,
    /// Files whose size could not be read.
    pub err_file_count: u64,
}

impl DirNode {
    /// Create a directory node with zeroed counters.
    pub fn new(path: impl Into<PathBuf>, depth: u32) -> Self {
        Self {
            path: path.into(),
            file_count: 0,
            size: 0,
            depth,
            err_dir_count: 0,
            err_file_count: 0,
        }
    }

    /// Directory containing this one, if any.
    pub fn parent_path(&self) -> Option<&Path> {
        self.path.parent()
    }

    /// Whether any entry under this directory failed to read.
    pub fn has_errors(&self) -> bool {
        self.err_dir_count > 0 || self.err_file_count > 0
    }

    /// Add another node's counters into this one.
    pub fn absorb(&mut self, totals: &NodeTotals) {
        self.file_count += totals.file_count;
        self.size += totals.size;
        self.err_dir_count += totals.err_dir_count;
        self.err_file_count += totals.err_file_count;
    }

    /// Snapshot of the counters that propagate to ancestors.
    pub fn totals(&self) -> NodeTotals {
        NodeTotals {
            file_count: self.file_count,
            size: self.size,
            err_dir_count: self.err_dir_count,
            err_file_count: self.err_file_count,
        }
    }
}

/// The additive part of a [`DirNode`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeTotals {
    pub file_count: u64,
    pub size: u64,
    pub err_dir_count: u64,
    pub err_file_count: u64,
}
