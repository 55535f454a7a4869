//! Directory traversal for dirsizes.
//!
//! This crate walks a directory tree once with jwalk and feeds every
//! directory and file into a [`DirTreeBuilder`], producing an aggregated
//! [`DirTree`] where each directory carries the size, file count, and
//! error counts of its whole subtree.
//!
//! Unreadable directories and files do not abort the scan: they are
//! counted against their containing directory, and unreadable directories
//! are also listed by path. Files that vanish between listing and stat
//! are left out silently.
//!
//! # Example
//!
//! ```rust,no_run
//! use dirsizes_scan::{DirScanner, ScanConfig};
//!
//! let config = ScanConfig::new("/path/to/scan");
//! let tree = DirScanner::new().scan(&config).unwrap();
//!
//! println!("Total size: {} bytes", tree.total_size());
//! println!("Unreadable directories: {}", tree.unreadable().len());
//! ```
//!
//! # Progress Monitoring
//!
//! ```rust,no_run
//! use dirsizes_scan::{DirScanner, ScanConfig};
//!
//! let scanner = DirScanner::new();
//! let mut progress_rx = scanner.subscribe();
//!
//! std::thread::spawn(move || {
//!     while let Ok(progress) = progress_rx.blocking_recv() {
//!         eprintln!("Scanned {} files", progress.files_scanned);
//!     }
//! });
//!
//! let tree = scanner.scan(&ScanConfig::new(".")).unwrap();
//! ```

mod progress;
mod scanner;

pub use progress::ScanProgress;
pub use scanner::DirScanner;

// Re-export core types for convenience
pub use dirsizes_core::{DirNode, DirTree, DirTreeBuilder, FileOutcome, ScanConfig, ScanError};
