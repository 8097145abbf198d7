// Total engine disk usage as a single byte count

use crate::engine::{ContainerEngine, EngineError, EngineResult};
use crate::models::{UsageEntry, UsageSample};
use crate::units::parse_size;
use tracing::debug;

pub struct UsageProbe<'a> {
    engine: &'a dyn ContainerEngine,
}

impl<'a> UsageProbe<'a> {
    pub fn new(engine: &'a dyn ContainerEngine) -> Self {
        Self { engine }
    }

    /// One disk usage query, no retry. Any failure (including a rejected
    /// query) means the engine is unavailable for our purposes.
    pub async fn sample(&self) -> EngineResult<UsageSample> {
        let entries = self
            .engine
            .disk_usage_breakdown()
            .await
            .map_err(|e| match e {
                EngineError::Step { message, .. } => EngineError::Unavailable(message),
                other => other,
            })?;
        let sample = total(&entries);
        debug!(
            categories = entries.len(),
            bytes = sample.bytes(),
            "disk usage sampled"
        );
        Ok(sample)
    }
}

/// Sum every row that parses; malformed rows contribute what they can (often 0).
pub fn total(entries: &[UsageEntry]) -> UsageSample {
    let bytes = entries
        .iter()
        .map(|e| parse_size(&e.size))
        .fold(0u64, u64::saturating_add);
    UsageSample::from_bytes(bytes)
}
