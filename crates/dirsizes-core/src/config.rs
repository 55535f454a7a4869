//! Scan configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Configuration for scanning operations.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root path to scan.
    pub root: PathBuf,

    /// Canonicalize the root before scanning. Affects the displayed paths
    /// and filesystem-root detection, not the totals.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub absolute_root: bool,

    /// Number of traversal threads (1 = serial, 0 = default rayon pool).
    #[builder(default = "1")]
    #[serde(default = "default_threads")]
    pub threads: usize,
}

fn default_true() -> bool {
    true
}

fn default_threads() -> usize {
    1
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a simple config for scanning a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            absolute_root: true,
            threads: 1,
        }
    }

    /// Resolve the root to scan, failing fast when it cannot be scanned.
    pub fn resolve_root(&self) -> Result<PathBuf, ScanError> {
        if self.root.as_os_str().is_empty() {
            return Err(ScanError::InvalidConfig {
                message: "Root path cannot be empty".to_string(),
            });
        }

        let root = if self.absolute_root {
            self.root
                .canonicalize()
                .map_err(|e| ScanError::io(&self.root, e))?
        } else {
            self.root.clone()
        };

        let metadata = std::fs::metadata(&root).map_err(|e| ScanError::io(&root, e))?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory { path: root });
        }

        std::fs::read_dir(&root).map_err(|e| ScanError::io(&root, e))?;

        Ok(root)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
