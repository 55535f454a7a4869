//! Size units and fixed-unit size formatting.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoEnumIterator};

use crate::error::ScanError;

/// Binary size unit used for display and for filter thresholds.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum SizeUnit {
    /// Plain bytes.
    #[strum(serialize = "bytes", serialize = "b", serialize = "o")]
    Bytes,
    /// 1024 bytes.
    #[strum(serialize = "KiB", serialize = "k", serialize = "kb")]
    KiB,
    /// 1024^2 bytes.
    #[default]
    #[strum(serialize = "MiB", serialize = "m", serialize = "mb")]
    MiB,
    /// 1024^3 bytes.
    #[strum(serialize = "GiB", serialize = "g", serialize = "gb")]
    GiB,
    /// 1024^4 bytes.
    #[strum(serialize = "TiB", serialize = "t", serialize = "tb")]
    TiB,
}

impl SizeUnit {
    /// Parse a unit selector such as `"MiB"`, `"m"` or `"bytes"`.
    pub fn from_selector(selector: &str) -> Result<Self, ScanError> {
        Self::from_str(selector.trim()).map_err(|_| ScanError::UnknownSizeUnit {
            selector: selector.to_string(),
        })
    }

    /// Unit for a power-of-1024 index (0 = bytes, 4 = TiB).
    pub fn from_index(index: u32) -> Result<Self, ScanError> {
        Self::iter()
            .find(|unit| unit.index() == index)
            .ok_or_else(|| ScanError::UnknownSizeUnit {
                selector: index.to_string(),
            })
    }

    /// Power of 1024 this unit stands for.
    pub fn index(self) -> u32 {
        match self {
            SizeUnit::Bytes => 0,
            SizeUnit::KiB => 1,
            SizeUnit::MiB => 2,
            SizeUnit::GiB => 3,
            SizeUnit::TiB => 4,
        }
    }

    /// Number of bytes in one unit.
    pub fn divisor(self) -> u64 {
        1024u64.pow(self.index())
    }

    /// Bytes in `count` units, saturating at `u64::MAX`.
    pub fn to_bytes(self, count: u64) -> u64 {
        count.saturating_mul(self.divisor())
    }

    /// Suffix appended to formatted sizes.
    pub fn suffix(self) -> &'static str {
        match self {
            SizeUnit::Bytes => "B",
            SizeUnit::KiB => "KB",
            SizeUnit::MiB => "MB",
            SizeUnit::GiB => "GB",
            SizeUnit::TiB => "TB",
        }
    }
}

impl std::fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SizeUnit::Bytes => "bytes",
            SizeUnit::KiB => "KiB",
            SizeUnit::MiB => "MiB",
            SizeUnit::GiB => "GiB",
            SizeUnit::TiB => "TiB",
        };
        f.write_str(name)
    }
}

/// Formats byte counts in one fixed unit.
///
/// Values are divided by the unit's divisor and rendered with exactly
/// `decimal_places` decimals. Rounding is done by the standard float
/// formatter: nearest value, ties to even on the exact binary value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeFormatter {
    unit: SizeUnit,
    decimal_places: usize,
}

impl SizeFormatter {
    /// Create a formatter for `unit` with `decimal_places` decimals.
    pub fn new(unit: SizeUnit, decimal_places: usize) -> Self {
        Self {
            unit,
            decimal_places,
        }
    }

    /// Create a formatter from a unit selector string.
    pub fn from_selector(selector: &str, decimal_places: usize) -> Result<Self, ScanError> {
        Ok(Self::new(SizeUnit::from_selector(selector)?, decimal_places))
    }

    /// Display unit.
    pub fn unit(&self) -> SizeUnit {
        self.unit
    }

    /// Configured precision.
    pub fn decimal_places(&self) -> usize {
        self.decimal_places
    }

    /// Render `bytes` in the configured unit, e.g. `"1.5 MB"`.
    pub fn format(&self, bytes: u64) -> String {
        let value = bytes as f64 / self.unit.divisor() as f64;
        format!(
            "{value:.prec$} {suffix}",
            prec = self.decimal_places,
            suffix = self.unit.suffix()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_aliases() {
        assert_eq!(SizeUnit::from_selector("MiB").unwrap(), SizeUnit::MiB);
        assert_eq!(SizeUnit::from_selector("m").unwrap(), SizeUnit::MiB);
        assert_eq!(SizeUnit::from_selector("GB").unwrap(), SizeUnit::GiB);
        assert_eq!(SizeUnit::from_selector("bytes").unwrap(), SizeUnit::Bytes);
        assert_eq!(SizeUnit::from_selector(" k ").unwrap(), SizeUnit::KiB);
    }

    #[test]
    fn test_unknown_selector_rejected() {
        let err = SizeUnit::from_selector("parsec").unwrap_err();
        assert!(matches!(err, ScanError::UnknownSizeUnit { ref selector } if selector == "parsec"));
        assert!(err.to_string().contains("parsec"));

        assert!(SizeUnit::from_index(5).is_err());
        assert_eq!(SizeUnit::from_index(3).unwrap(), SizeUnit::GiB);
    }

    #[test]
    fn test_to_bytes() {
        assert_eq!(SizeUnit::Bytes.to_bytes(7), 7);
        assert_eq!(SizeUnit::KiB.to_bytes(2), 2048);
        assert_eq!(SizeUnit::MiB.to_bytes(1), 1_048_576);
        assert_eq!(SizeUnit::TiB.to_bytes(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_format_with_decimals() {
        let formatter = SizeFormatter::new(SizeUnit::MiB, 1);
        assert_eq!(formatter.format(1_572_864), "1.5 MB");
        assert_eq!(formatter.format(0), "0.0 MB");

        let formatter = SizeFormatter::new(SizeUnit::KiB, 2);
        assert_eq!(formatter.format(1024), "1.00 KB");
    }

    #[test]
    fn test_format_whole_units_without_decimals() {
        for unit in SizeUnit::iter() {
            let formatter = SizeFormatter::new(unit, 0);
            for n in [0u64, 1, 3, 42] {
                assert_eq!(
                    formatter.format(unit.to_bytes(n)),
                    format!("{n} {}", unit.suffix())
                );
            }
        }
    }

    #[test]
    fn test_bytes_suffix() {
        let formatter = SizeFormatter::from_selector("b", 0).unwrap();
        assert_eq!(formatter.format(500), "500 B");
    }
}
