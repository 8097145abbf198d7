// Cleanup step descriptors and per-run outcome

use std::fmt;

/// Administrative actions issued against the engine, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CleanupStep {
    StopRunning,
    PruneBuildCache,
    PruneContainers,
    PruneImages,
    PruneVolumes,
    PruneSystem,
}

impl CleanupStep {
    pub fn label(self) -> &'static str {
        match self {
            CleanupStep::StopRunning => "stop running containers",
            CleanupStep::PruneBuildCache => "prune build cache",
            CleanupStep::PruneContainers => "prune stopped containers",
            CleanupStep::PruneImages => "prune unused images",
            CleanupStep::PruneVolumes => "prune unused volumes",
            CleanupStep::PruneSystem => "prune system",
        }
    }
}

impl fmt::Display for CleanupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    pub step: CleanupStep,
    pub message: String,
}

/// What happened during one sequencer run. Only used for logs and tests;
/// the summary is computed from measured usage alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupOutcome {
    pub completed: Vec<CleanupStep>,
    pub failed: Vec<StepFailure>,
}

impl CleanupOutcome {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
