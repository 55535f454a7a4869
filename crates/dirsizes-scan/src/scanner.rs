//! JWalk-based directory scanner.

use std::path::Path;
use std::time::Duration;

use jwalk::{Parallelism, WalkDir};
use tokio::sync::broadcast;
use tracing::{Span, debug, info, info_span, warn};

use dirsizes_core::{DirTree, DirTreeBuilder, FileOutcome, ScanConfig, ScanError};

use crate::progress::{ProgressTracker, ScanProgress};

/// Builds a [`DirTree`] from one top-down traversal.
pub struct DirScanner {
    progress_tx: broadcast::Sender<ScanProgress>,
    span: Span,
}

impl DirScanner {
    /// Create a new scanner logging under a `scan` span.
    pub fn new() -> Self {
        Self::with_span(info_span!("scan"))
    }

    /// Create a scanner whose log events are recorded under `span`.
    pub fn with_span(span: Span) -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self { progress_tx, span }
    }

    /// Subscribe to scan progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Scan the configured root and return the aggregated tree.
    ///
    /// Only an unusable root fails the scan. Unreadable directories and
    /// files met along the way end up in the tree's counters and its
    /// unreadable path list.
    pub fn scan(&self, config: &ScanConfig) -> Result<DirTree, ScanError> {
        let _entered = self.span.enter();
        info!("start of scan");

        let root_path = config.resolve_root()?;
        let mut builder = DirTreeBuilder::new(&root_path);
        let mut tracker = ProgressTracker::new();

        info!(root = %builder.root_path().display(), "beginning of file browsing");
        self.walk(config, &mut builder, &mut tracker);
        let _ = self.progress_tx.send(tracker.snapshot());

        info!(
            dirs = builder.len(),
            unreadable = builder.unreadable().len(),
            "reconciling errors and aggregating"
        );
        let tree = builder.finish();

        let elapsed_ms = u64::try_from(tree.scan_duration().as_millis()).unwrap_or(u64::MAX);
        info!(
            total_size = tree.total_size(),
            total_files = tree.total_files(),
            elapsed_ms,
            "scan finished"
        );
        Ok(tree)
    }

    fn walk(&self, config: &ScanConfig, builder: &mut DirTreeBuilder, tracker: &mut ProgressTracker) {
        let walker = WalkDir::new(builder.root_path())
            .parallelism(parallelism(config.threads))
            .skip_hidden(false)
            .follow_links(false)
            .min_depth(0);

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    match err.path() {
                        Some(path) => {
                            warn!(path = %path.display(), error = %err, "unable to list directory");
                            builder.record_unreadable(path);
                            tracker.record_error();
                        }
                        None => warn!(error = %err, "traversal error without a path"),
                    }
                    continue;
                }
            };

            let path = entry.path();

            // A directory whose listing failed is still yielded, with the
            // failure attached.
            if let Some(err) = &entry.read_children_error {
                warn!(path = %path.display(), error = %err, "unable to list directory");
                builder.record_unreadable(&path);
                tracker.record_error();
            }

            // The root was registered by the builder.
            if entry.depth() == 0 {
                continue;
            }

            let file_type = entry.file_type();

            if file_type.is_dir() {
                builder.add_dir(&path);
                tracker.record_dir();
            } else if file_type.is_symlink() && points_to_dir(&path) {
                // Registered, but never descended into.
                builder.add_dir(&path);
                tracker.record_dir();
            } else {
                let outcome = builder.add_file(&path, std::fs::metadata(&path).map(|m| m.len()));
                match outcome {
                    FileOutcome::Denied => {
                        debug!(path = %path.display(), "permission denied reading file size");
                    }
                    FileOutcome::Skipped => {
                        debug!(path = %path.display(), "file skipped, size unavailable");
                    }
                    FileOutcome::Counted(_) => {}
                }

                if tracker.record_file(&path, outcome) {
                    let _ = self.progress_tx.send(tracker.snapshot());
                }
            }
        }
    }
}

impl Default for DirScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn parallelism(threads: usize) -> Parallelism {
    match threads {
        0 => Parallelism::RayonDefaultPool {
            busy_timeout: Duration::from_millis(100),
        },
        1 => Parallelism::Serial,
        n => Parallelism::RayonNewPool(n),
    }
}

/// Whether a symlink resolves to a directory.
fn points_to_dir(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|m| m.is_dir())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("dir1")).unwrap();
        fs::create_dir(root.join("dir2")).unwrap();
        fs::create_dir(root.join("dir1/subdir")).unwrap();

        fs::write(root.join("file1.txt"), "hello").unwrap();
        fs::write(root.join("dir1/file2.txt"), "world world world").unwrap();
        fs::write(root.join("dir1/subdir/file3.txt"), "test").unwrap();
        fs::write(root.join("dir2/file4.txt"), "another file here").unwrap();
        fs::write(root.join("dir2/.hidden"), "xy").unwrap();

        temp
    }

    #[test]
    fn test_basic_scan() {
        let temp = create_test_tree();
        let config = ScanConfig::new(temp.path());

        let tree = DirScanner::new().scan(&config).unwrap();

        assert_eq!(tree.total_files(), 5);
        assert_eq!(tree.total_size(), 5 + 17 + 4 + 17 + 2);
        assert_eq!(tree.len(), 4);
        assert!(!tree.has_errors());
    }

    #[test]
    fn test_subdirectory_totals() {
        let temp = create_test_tree();
        let config = ScanConfig::new(temp.path());

        let tree = DirScanner::new().scan(&config).unwrap();
        let root = tree.root_path().to_path_buf();

        let dir1 = tree.get(root.join("dir1")).unwrap();
        assert_eq!(dir1.size, 21);
        assert_eq!(dir1.file_count, 2);
        assert_eq!(dir1.depth, 1);

        let subdir = tree.get(root.join("dir1/subdir")).unwrap();
        assert_eq!(subdir.depth, 2);
        assert_eq!(subdir.size, 4);
    }

    #[test]
    fn test_parallel_scan_matches_serial() {
        let temp = create_test_tree();
        let serial = DirScanner::new().scan(&ScanConfig::new(temp.path())).unwrap();

        let config = ScanConfig::builder()
            .root(temp.path())
            .threads(4usize)
            .build()
            .unwrap();
        let parallel = DirScanner::new().scan(&config).unwrap();

        for node in serial.nodes() {
            assert_eq!(parallel.get(&node.path), Some(node));
        }
        assert_eq!(serial.len(), parallel.len());
    }

    #[test]
    fn test_progress_final_snapshot() {
        let temp = create_test_tree();
        let scanner = DirScanner::new();
        let mut rx = scanner.subscribe();

        scanner.scan(&ScanConfig::new(temp.path())).unwrap();

        let progress = rx.try_recv().unwrap();
        assert_eq!(progress.files_scanned, 5);
        assert_eq!(progress.dirs_scanned, 3);
    }
}
