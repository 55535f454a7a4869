//! Largest-directories reports for dirsizes.
//!
//! A finished [`DirTree`] becomes a [`ScanReport`] (every directory,
//! largest first). A [`ReportBuilder`] then keeps the top directories,
//! applies a [`DirFilter`], and projects each survivor into a
//! [`ReportRow`] with a formatted size:
//!
//! ```rust,ignore
//! use dirsizes_report::{DirFilter, ReportBuilder, ReportConfig, ScanReport};
//! use dirsizes_scan::{DirScanner, ScanConfig};
//! use dirsizes_core::SizeUnit;
//!
//! let tree = DirScanner::new().scan(&ScanConfig::new("/path/to/scan")).unwrap();
//! let scan = ScanReport::from_tree(tree);
//!
//! let config = ReportConfig::builder()
//!     .size_unit(SizeUnit::GiB)
//!     .max_results(20usize)
//!     .filter(DirFilter::at_least(SizeUnit::MiB, 1))
//!     .build()
//!     .unwrap();
//!
//! for row in ReportBuilder::with_config(config).build(&scan).rows {
//!     println!("{} {}", row.size, row.path.display());
//! }
//! ```

mod filter;
mod report;

pub use filter::DirFilter;
pub use report::{
    Report, ReportBuilder, ReportConfig, ReportConfigBuilder, ReportConfigBuilderError, ReportRow,
    ScanReport,
};

// Re-export core types
pub use dirsizes_core::{DirNode, DirTree, SizeFormatter, SizeUnit};
