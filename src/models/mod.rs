// Domain models for one cleanup run

mod cleanup;
mod run;
mod usage;

pub use cleanup::{CleanupOutcome, CleanupStep, StepFailure};
pub use run::RunConfig;
pub use usage::{SummaryReport, UsageEntry, UsageSample};
