//! Largest-directories report.

use std::path::PathBuf;
use std::time::Duration;

use derive_builder::Builder;
use itertools::Itertools;
use serde::Serialize;

use dirsizes_core::{DirNode, DirTree, SizeFormatter, SizeUnit};

use crate::filter::DirFilter;

/// Finished scan, directories ordered by size.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Root path that was scanned.
    pub root_path: PathBuf,
    /// Every directory, largest first; equal sizes ordered by path.
    pub nodes: Vec<DirNode>,
    /// Directories whose listing failed.
    pub unreadable: Vec<PathBuf>,
    /// Duration of the scan.
    pub scan_duration: Duration,
}

impl ScanReport {
    /// Take ownership of a finished tree and sort its directories.
    pub fn from_tree(tree: DirTree) -> Self {
        let scan_duration = tree.scan_duration();
        let (root_path, nodes, unreadable) = tree.into_parts();
        let nodes = nodes
            .into_iter()
            .sorted_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)))
            .collect();

        Self {
            root_path,
            nodes,
            unreadable,
            scan_duration,
        }
    }

    /// The root directory's node.
    pub fn root(&self) -> Option<&DirNode> {
        self.nodes.iter().find(|node| node.path == self.root_path)
    }
}

impl From<DirTree> for ScanReport {
    fn from(tree: DirTree) -> Self {
        Self::from_tree(tree)
    }
}

/// Configuration for building a report.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ReportConfig {
    /// Unit sizes are displayed in.
    #[builder(default)]
    pub size_unit: SizeUnit,

    /// Decimal places in displayed sizes.
    #[builder(default = "1")]
    pub decimal_places: usize,

    /// Maximum number of directory rows and of error paths shown.
    #[builder(default = "100")]
    pub max_results: usize,

    /// Which directories may appear. There is no default threshold.
    pub filter: DirFilter,
}

impl ReportConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.max_results == Some(0) {
            return Err("Number of results must be at least 1".to_string());
        }
        Ok(())
    }
}

impl ReportConfig {
    /// Create a new config builder.
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder::default()
    }

    /// Config with default display settings and the given filter.
    pub fn new(filter: DirFilter) -> Self {
        Self {
            size_unit: SizeUnit::default(),
            decimal_places: 1,
            max_results: 100,
            filter,
        }
    }

    /// Formatter matching the display settings.
    pub fn formatter(&self) -> SizeFormatter {
        SizeFormatter::new(self.size_unit, self.decimal_places)
    }
}

/// One display row of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub path: PathBuf,
    pub size: String,
    pub file_count: u64,
    pub depth: u32,
    pub nbr_of_err_dir: u64,
    pub nbr_of_err_file: u64,
}

impl ReportRow {
    /// Column headers, in display order.
    pub const COLUMNS: [&'static str; 6] = [
        "path",
        "size",
        "fileCount",
        "depth",
        "nbrOfErrDir",
        "nbrOfErrFile",
    ];

    /// Project a directory into a display row.
    pub fn project(node: &DirNode, formatter: &SizeFormatter) -> Self {
        Self {
            path: node.path.clone(),
            size: formatter.format(node.size),
            file_count: node.file_count,
            depth: node.depth,
            nbr_of_err_dir: node.err_dir_count,
            nbr_of_err_file: node.err_file_count,
        }
    }

    /// Cell texts in the order of [`ReportRow::COLUMNS`].
    pub fn cells(&self) -> [String; 6] {
        [
            self.path.display().to_string(),
            self.size.clone(),
            self.file_count.to_string(),
            self.depth.to_string(),
            self.nbr_of_err_dir.to_string(),
            self.nbr_of_err_file.to_string(),
        ]
    }
}

/// User-facing view of a scan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Root path that was scanned.
    pub root_path: PathBuf,
    /// Unit used in the `size` column.
    pub size_unit: SizeUnit,
    /// Size of the whole tree in bytes.
    pub total_size: u64,
    /// Files counted in the whole tree.
    pub total_files: u64,
    /// Directory rows, largest first.
    pub rows: Vec<ReportRow>,
    /// Unreadable directories, capped like the rows.
    pub errors: Vec<PathBuf>,
    /// Number of unreadable directories before capping.
    pub total_errors: usize,
    /// Duration of the scan.
    pub scan_duration: Duration,
}

impl Report {
    /// Check if there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.errors.is_empty()
    }

    /// Number of error paths left out by the cap.
    pub fn hidden_errors(&self) -> usize {
        self.total_errors.saturating_sub(self.errors.len())
    }
}

/// Turns a [`ScanReport`] into a [`Report`].
pub struct ReportBuilder {
    config: ReportConfig,
}

impl ReportBuilder {
    /// Create a report builder with the given config.
    pub fn with_config(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Config in use.
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Keep the largest `max_results` directories, drop those the filter
    /// rejects, and project the rest. Errors are capped independently.
    pub fn build(&self, scan: &ScanReport) -> Report {
        let formatter = self.config.formatter();
        let limit = self.config.max_results;

        let rows = scan
            .nodes
            .iter()
            .take(limit)
            .filter(|node| self.config.filter.accepts(node))
            .map(|node| ReportRow::project(node, &formatter))
            .collect();

        let (total_size, total_files) = scan
            .root()
            .map(|root| (root.size, root.file_count))
            .unwrap_or_default();

        Report {
            root_path: scan.root_path.clone(),
            size_unit: self.config.size_unit,
            total_size,
            total_files,
            rows,
            errors: scan.unreadable.iter().take(limit).cloned().collect(),
            total_errors: scan.unreadable.len(),
            scan_duration: scan.scan_duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirsizes_core::DirTreeBuilder;
    use std::path::Path;

    fn sample_tree() -> DirTree {
        let mut builder = DirTreeBuilder::new("/r");
        builder.add_dir("/r/big");
        builder.add_dir("/r/mid");
        builder.add_dir("/r/tie");
        builder.add_file(Path::new("/r/big/a"), Ok(3_000_000));
        builder.add_file(Path::new("/r/mid/b"), Ok(2_000));
        builder.add_file(Path::new("/r/tie/c"), Ok(2_000));
        builder.record_unreadable("/r/x");
        builder.record_unreadable("/r/y");
        builder.finish()
    }

    #[test]
    fn test_sorted_by_size_then_path() {
        let scan = ScanReport::from_tree(sample_tree());
        let paths: Vec<_> = scan.nodes.iter().map(|n| n.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/r"),
                PathBuf::from("/r/big"),
                PathBuf::from("/r/mid"),
                PathBuf::from("/r/tie"),
            ]
        );
        assert_eq!(scan.root().unwrap().size, 3_004_000);
    }

    #[test]
    fn test_config_requires_filter() {
        assert!(ReportConfig::builder().build().is_err());
        assert!(
            ReportConfig::builder()
                .filter(DirFilter::AcceptAll)
                .max_results(0usize)
                .build()
                .is_err()
        );

        let config = ReportConfig::builder()
            .filter(DirFilter::AcceptAll)
            .build()
            .unwrap();
        assert_eq!(config.size_unit, SizeUnit::MiB);
        assert_eq!(config.decimal_places, 1);
        assert_eq!(config.max_results, 100);
    }

    #[test]
    fn test_cap_applies_before_filter() {
        let scan = ScanReport::from_tree(sample_tree());
        let config = ReportConfig::builder()
            .max_results(2usize)
            .filter(DirFilter::custom(|node| node.depth == 1))
            .build()
            .unwrap();

        let report = ReportBuilder::with_config(config).build(&scan);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].path, PathBuf::from("/r/big"));
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn test_errors_capped_independently() {
        let scan = ScanReport::from_tree(sample_tree());
        let config = ReportConfig::builder()
            .max_results(1usize)
            .filter(DirFilter::at_least(SizeUnit::GiB, 1))
            .build()
            .unwrap();

        let report = ReportBuilder::with_config(config).build(&scan);
        assert!(report.rows.is_empty());
        assert_eq!(report.errors, vec![PathBuf::from("/r/x")]);
        assert_eq!(report.total_errors, 2);
        assert_eq!(report.hidden_errors(), 1);
        assert!(!report.is_empty());
    }

    #[test]
    fn test_row_projection() {
        let mut node = DirNode::new("/r/big", 1);
        node.size = 3_145_728;
        node.file_count = 4;
        node.err_dir_count = 1;

        let row = ReportRow::project(&node, &SizeFormatter::new(SizeUnit::MiB, 1));
        assert_eq!(
            row.cells(),
            ["/r/big", "3.0 MB", "4", "1", "1", "0"].map(String::from)
        );
    }
}
