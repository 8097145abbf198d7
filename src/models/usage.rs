// Disk usage samples and the before/after summary

use std::fmt;

/// One row of the engine's disk usage breakdown, e.g. ("Images", "10.2GB").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageEntry {
    pub category: String,
    pub size: String,
}

impl UsageEntry {
    pub fn new(category: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            size: size.into(),
        }
    }
}

/// Total bytes reported by the engine at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct UsageSample(u64);

impl UsageSample {
    pub const fn from_bytes(bytes: u64) -> Self {
        Self(bytes)
    }

    pub const fn bytes(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UsageSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::units::format_bytes(self.0))
    }
}

/// Usage before and after cleanup. `reclaimed` is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryReport {
    pub initial: UsageSample,
    pub final_: UsageSample,
    pub reclaimed: UsageSample,
}
