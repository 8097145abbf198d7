// End-to-end run: probe, confirm, clean, probe again, summarize.

use crate::confirm::{ConfirmationGate, Decision, PromptInput};
use crate::engine::{ContainerEngine, EngineError, EngineResult};
use crate::models::{CleanupOutcome, RunConfig, SummaryReport, UsageSample};
use crate::probe::UsageProbe;
use crate::report::summarize;
use crate::sequencer::CleanupSequencer;
use std::future::Future;
use std::io::{self, Write};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Probing,
    AwaitingConfirmation,
    Cleaning,
    Reporting,
    Done,
    Cancelled,
    Aborted,
    Interrupted,
}

#[derive(Debug)]
pub enum RunOutcome {
    Completed {
        report: SummaryReport,
        cleanup: CleanupOutcome,
    },
    /// Operator answered anything but "y". Nothing was touched.
    Declined,
    /// A termination signal arrived. Steps already run are not undone.
    Interrupted,
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("could not read confirmation: {0} (rerun with --no-confirm to skip the prompt)")]
    Prompt(#[source] io::Error),
}

pub struct Orchestrator<'a> {
    engine: &'a dyn ContainerEngine,
    cfg: RunConfig,
}

impl<'a> Orchestrator<'a> {
    pub fn new(engine: &'a dyn ContainerEngine, cfg: RunConfig) -> Self {
        Self { engine, cfg }
    }

    /// Run until done or until `interrupt` resolves, whichever comes first.
    /// Dropping the workflow future stops it before its next engine call.
    pub async fn run_until<I, W, F>(
        &self,
        gate: ConfirmationGate<I, W>,
        interrupt: F,
    ) -> Result<RunOutcome, RunError>
    where
        I: PromptInput + 'static,
        W: Write + Send + 'static,
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = interrupt => {
                enter(RunState::Interrupted);
                Ok(RunOutcome::Interrupted)
            }
            result = self.run(gate) => result,
        }
    }

    pub async fn run<I, W>(&self, gate: ConfirmationGate<I, W>) -> Result<RunOutcome, RunError>
    where
        I: PromptInput + 'static,
        W: Write + Send + 'static,
    {
        enter(RunState::Idle);
        let probe = UsageProbe::new(self.engine);

        enter(RunState::Probing);
        let initial = abort_on_err(self.initial_sample(&probe).await)?;
        info!(bytes = initial.bytes(), "current engine disk usage: {initial}");

        enter(RunState::AwaitingConfirmation);
        if self.confirm(gate).await? == Decision::Cancelled {
            enter(RunState::Cancelled);
            return Ok(RunOutcome::Declined);
        }

        enter(RunState::Cleaning);
        let cleanup = abort_on_err(CleanupSequencer::new(self.engine).run(self.cfg).await)?;
        if !cleanup.is_clean() {
            warn!(
                failed = cleanup.failed.len(),
                "some cleanup steps failed; reporting measured usage anyway"
            );
        }

        enter(RunState::Probing);
        let final_ = abort_on_err(probe.sample().await)?;

        enter(RunState::Reporting);
        let report = summarize(initial, final_);

        enter(RunState::Done);
        Ok(RunOutcome::Completed { report, cleanup })
    }

    async fn initial_sample(&self, probe: &UsageProbe<'_>) -> EngineResult<UsageSample> {
        self.engine.ping().await?;
        probe.sample().await
    }

    /// The terminal read blocks, so it runs off the async workers where an
    /// interrupt can still be observed.
    async fn confirm<I, W>(&self, mut gate: ConfirmationGate<I, W>) -> Result<Decision, RunError>
    where
        I: PromptInput + 'static,
        W: Write + Send + 'static,
    {
        let cfg = self.cfg;
        tokio::task::spawn_blocking(move || gate.confirm(cfg))
            .await
            .map_err(|e| RunError::Prompt(io::Error::other(e)))?
            .map_err(RunError::Prompt)
    }
}

fn enter(state: RunState) {
    debug!(?state, "run state");
}

fn abort_on_err<T>(result: EngineResult<T>) -> EngineResult<T> {
    result.inspect_err(|e| {
        enter(RunState::Aborted);
        debug!(error = %e, "run aborted");
    })
}
