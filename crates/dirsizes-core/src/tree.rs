//! Directory model construction and the finished, read-only tree.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::aggregate;
use crate::node::DirNode;

static ROOT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]:\\|/)$").expect("root marker pattern is valid"));

/// Whether `path` is a filesystem root such as `/` or `C:\`.
pub fn is_filesystem_root(path: &Path) -> bool {
    ROOT_MARKER.is_match(&path.to_string_lossy())
}

/// Number of separator characters in `path`.
pub fn separator_count(path: &Path) -> usize {
    path.to_string_lossy()
        .chars()
        .filter(|c| std::path::is_separator(*c))
        .count()
}

/// Separator count that maps to depth zero for a scan rooted at `root`.
///
/// A filesystem root already ends with a separator, so its children carry
/// the same count as the root itself; it is pinned to zero instead.
pub fn root_dir_depth(root: &Path) -> usize {
    if is_filesystem_root(root) {
        0
    } else {
        separator_count(root)
    }
}

/// Drop trailing separators and redundant `.` components.
pub fn normalize_root(root: &Path) -> PathBuf {
    root.components().collect()
}

/// What happened to a file offered to [`DirTreeBuilder::add_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Size was added to the containing directory.
    Counted(u64),
    /// Size could not be read for lack of permission.
    Denied,
    /// File vanished or could not be read for another reason.
    Skipped,
}

/// Mutable model filled in while a traversal runs.
///
/// Consumed by [`DirTreeBuilder::finish`], which attributes unreadable
/// directories and aggregates totals exactly once.
#[derive(Debug)]
pub struct DirTreeBuilder {
    root_path: PathBuf,
    root_dir_depth: usize,
    nodes: IndexMap<PathBuf, DirNode>,
    unreadable: Vec<PathBuf>,
    started: Instant,
}

impl DirTreeBuilder {
    /// Start a model rooted at `root`, registering the root node.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root_path = normalize_root(root.as_ref());
        let root_dir_depth = root_dir_depth(&root_path);
        let mut nodes = IndexMap::new();
        nodes.insert(root_path.clone(), DirNode::new(root_path.clone(), 0));

        Self {
            root_path,
            root_dir_depth,
            nodes,
            unreadable: Vec::new(),
            started: Instant::now(),
        }
    }

    /// Normalized root path.
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Depth of `path` relative to the root, from its separator count.
    pub fn depth_of(&self, path: &Path) -> u32 {
        if path == self.root_path {
            return 0;
        }
        let depth = separator_count(path).saturating_sub(self.root_dir_depth);
        u32::try_from(depth).unwrap_or(u32::MAX)
    }

    /// Register a directory. Registering the same path twice is a no-op.
    pub fn add_dir(&mut self, path: impl AsRef<Path>) -> &mut DirNode {
        self.node_mut(path.as_ref())
    }

    /// Account for a file given the result of reading its size.
    ///
    /// The containing directory is registered on demand.
    pub fn add_file(&mut self, path: &Path, size: io::Result<u64>) -> FileOutcome {
        let Some(dir) = path.parent() else {
            return FileOutcome::Skipped;
        };

        match size {
            Ok(len) => {
                let node = self.node_mut(dir);
                node.size += len;
                node.file_count += 1;
                FileOutcome::Counted(len)
            }
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                self.node_mut(dir).err_file_count += 1;
                FileOutcome::Denied
            }
            Err(_) => FileOutcome::Skipped,
        }
    }

    /// Record a directory whose contents could not be listed.
    ///
    /// Recording the same path twice has no further effect.
    pub fn record_unreadable(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.unreadable.contains(&path) {
            self.unreadable.push(path);
        }
    }

    /// Number of directories registered so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root is registered on construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Unreadable directories recorded so far.
    pub fn unreadable(&self) -> &[PathBuf] {
        &self.unreadable
    }

    /// Attribute unreadable directories, aggregate totals, and freeze.
    pub fn finish(mut self) -> DirTree {
        self.reconcile_errors();
        aggregate::propagate(&mut self.nodes);

        DirTree {
            root_path: self.root_path,
            nodes: self.nodes,
            unreadable: self.unreadable,
            scan_duration: self.started.elapsed(),
        }
    }

    /// Each unreadable directory counts against its containing directory,
    /// except the root, which has no parent in the model.
    fn reconcile_errors(&mut self) {
        for path in &self.unreadable {
            let owner = if *path == self.root_path {
                Some(path.as_path())
            } else {
                path.parent()
            };
            if let Some(node) = owner.and_then(|owner| self.nodes.get_mut(owner)) {
                node.err_dir_count += 1;
            }
        }
    }

    fn node_mut(&mut self, dir: &Path) -> &mut DirNode {
        let index = match self.nodes.get_index_of(dir) {
            Some(index) => index,
            None => {
                let depth = self.depth_of(dir);
                self.nodes
                    .insert_full(dir.to_path_buf(), DirNode::new(dir, depth))
                    .0
            }
        };
        &mut self.nodes[index]
    }
}

/// Finished scan model. Counters include all descendants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirTree {
    root_path: PathBuf,
    nodes: IndexMap<PathBuf, DirNode>,
    unreadable: Vec<PathBuf>,
    scan_duration: Duration,
}

impl DirTree {
    /// Root path that was scanned.
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// The root node. It is always the first node registered.
    pub fn root(&self) -> &DirNode {
        &self.nodes[0]
    }

    /// Look up a directory by path.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&DirNode> {
        self.nodes.get(path.as_ref())
    }

    /// All directories in discovery order.
    pub fn nodes(&self) -> impl Iterator<Item = &DirNode> {
        self.nodes.values()
    }

    /// Number of directories in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree holds at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Directories whose listing failed, in the order they were met.
    pub fn unreadable(&self) -> &[PathBuf] {
        &self.unreadable
    }

    /// Time spent from the start of the traversal to the end of aggregation.
    pub fn scan_duration(&self) -> Duration {
        self.scan_duration
    }

    /// Total size in bytes of every readable file.
    pub fn total_size(&self) -> u64 {
        self.root().size
    }

    /// Total number of readable files.
    pub fn total_files(&self) -> u64 {
        self.root().file_count
    }

    /// Check if any directory or file could not be read.
    pub fn has_errors(&self) -> bool {
        !self.unreadable.is_empty() || self.root().has_errors()
    }

    /// Split into owned nodes and the unreadable path list.
    pub fn into_parts(self) -> (PathBuf, Vec<DirNode>, Vec<PathBuf>) {
        (
            self.root_path,
            self.nodes.into_values().collect(),
            self.unreadable,
        )
    }
}
