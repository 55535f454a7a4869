//! Core types for dirsizes.
//!
//! This crate holds the directory model shared by the scanner and the
//! report builder: size units and formatting, per-directory nodes, the
//! tree builder with its aggregation pass, configuration, and errors.

mod aggregate;
mod config;
mod error;
mod node;
mod size;
mod tree;

pub use config::{ScanConfig, ScanConfigBuilder, ScanConfigBuilderError};
pub use error::ScanError;
pub use node::{DirNode, NodeTotals};
pub use size::{SizeFormatter, SizeUnit};
pub use tree::{
    DirTree, DirTreeBuilder, FileOutcome, is_filesystem_root, normalize_root, root_dir_depth,
    separator_count,
};
