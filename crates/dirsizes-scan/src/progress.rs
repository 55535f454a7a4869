//! Scan progress reporting.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use dirsizes_core::FileOutcome;

/// Progress information during a scan.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Number of files whose size was counted.
    pub files_scanned: u64,
    /// Number of directories discovered.
    pub dirs_scanned: u64,
    /// Total bytes counted so far.
    pub bytes_scanned: u64,
    /// Path of the last entry processed.
    pub current_path: PathBuf,
    /// Unreadable directories plus files with denied stats.
    pub errors_count: u64,
    /// Time elapsed since scan started.
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            files_scanned: 0,
            dirs_scanned: 0,
            bytes_scanned: 0,
            current_path: PathBuf::new(),
            errors_count: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Calculate scan rate in files per second.
    pub fn files_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.files_scanned as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Get total items scanned (files + dirs).
    pub fn total_items(&self) -> u64 {
        self.files_scanned + self.dirs_scanned
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Running counters for one scan.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    start_time: Instant,
    files_scanned: u64,
    dirs_scanned: u64,
    bytes_scanned: u64,
    errors_count: u64,
    current_path: PathBuf,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            files_scanned: 0,
            dirs_scanned: 0,
            bytes_scanned: 0,
            errors_count: 0,
            current_path: PathBuf::new(),
        }
    }

    /// Record a file outcome. Returns true when a snapshot is due.
    pub fn record_file(&mut self, path: &Path, outcome: FileOutcome) -> bool {
        match outcome {
            FileOutcome::Counted(size) => {
                self.files_scanned += 1;
                self.bytes_scanned += size;
                if self.files_scanned % 1000 == 0 {
                    self.current_path = path.to_path_buf();
                    return true;
                }
            }
            FileOutcome::Denied => self.errors_count += 1,
            FileOutcome::Skipped => {}
        }
        false
    }

    pub fn record_dir(&mut self) {
        self.dirs_scanned += 1;
    }

    pub fn record_error(&mut self) {
        self.errors_count += 1;
    }

    pub fn snapshot(&self) -> ScanProgress {
        ScanProgress {
            files_scanned: self.files_scanned,
            dirs_scanned: self.dirs_scanned,
            bytes_scanned: self.bytes_scanned,
            current_path: self.current_path.clone(),
            errors_count: self.errors_count,
            elapsed: self.start_time.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_every_thousand_files() {
        let mut tracker = ProgressTracker::new();
        let path = Path::new("/r/f");

        let due = (0..1000)
            .filter(|_| tracker.record_file(path, FileOutcome::Counted(2)))
            .count();
        assert_eq!(due, 1);

        tracker.record_file(path, FileOutcome::Denied);
        tracker.record_file(path, FileOutcome::Skipped);
        tracker.record_dir();
        tracker.record_error();

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.files_scanned, 1000);
        assert_eq!(snapshot.bytes_scanned, 2000);
        assert_eq!(snapshot.errors_count, 2);
        assert_eq!(snapshot.total_items(), 1001);
        assert_eq!(snapshot.current_path, PathBuf::from("/r/f"));
    }
}
