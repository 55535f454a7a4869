//! Row predicates for reports.

use std::fmt;
use std::sync::Arc;

use dirsizes_core::{DirNode, SizeUnit};

/// Decides which directories appear in a report.
///
/// The threshold is independent of the display unit: a report may show
/// sizes in GiB while keeping everything at or above 1 MiB.
#[derive(Clone)]
pub enum DirFilter {
    /// Every directory passes.
    AcceptAll,
    /// Directories at or above this many bytes pass.
    MinSize(u64),
    /// Caller-supplied predicate.
    Custom(Arc<dyn Fn(&DirNode) -> bool + Send + Sync>),
}

impl DirFilter {
    /// Keep directories of at least `count` units.
    pub fn at_least(unit: SizeUnit, count: u64) -> Self {
        DirFilter::MinSize(unit.to_bytes(count))
    }

    /// Wrap an arbitrary predicate.
    pub fn custom(predicate: impl Fn(&DirNode) -> bool + Send + Sync + 'static) -> Self {
        DirFilter::Custom(Arc::new(predicate))
    }

    /// Check a directory against the filter.
    pub fn accepts(&self, node: &DirNode) -> bool {
        match self {
            DirFilter::AcceptAll => true,
            DirFilter::MinSize(min) => node.size >= *min,
            DirFilter::Custom(predicate) => predicate(node),
        }
    }
}

impl fmt::Debug for DirFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirFilter::AcceptAll => f.write_str("AcceptAll"),
            DirFilter::MinSize(min) => f.debug_tuple("MinSize").field(min).finish(),
            DirFilter::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
