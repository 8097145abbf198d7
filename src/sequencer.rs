// Fixed, strictly sequential cleanup steps against the engine

use crate::engine::{ContainerEngine, EngineError, EngineResult};
use crate::models::{CleanupOutcome, CleanupStep, RunConfig, StepFailure};
use tracing::{info, warn};

pub struct CleanupSequencer<'a> {
    engine: &'a dyn ContainerEngine,
}

impl<'a> CleanupSequencer<'a> {
    pub fn new(engine: &'a dyn ContainerEngine) -> Self {
        Self { engine }
    }

    /// Run every step in order. Step failures are logged and recorded; only
    /// a missing or unreachable engine stops the sequence early.
    pub async fn run(&self, cfg: RunConfig) -> EngineResult<CleanupOutcome> {
        let mut outcome = CleanupOutcome::default();

        if cfg.force_stop_running {
            let result = self.stop_running().await;
            record(&mut outcome, CleanupStep::StopRunning, result)?;
        }

        // Futures are lazy: each prune starts only when awaited below.
        let prunes = [
            (CleanupStep::PruneBuildCache, self.engine.prune_build_cache()),
            (CleanupStep::PruneContainers, self.engine.prune_containers()),
            (CleanupStep::PruneImages, self.engine.prune_images()),
            (CleanupStep::PruneVolumes, self.engine.prune_volumes()),
            (CleanupStep::PruneSystem, self.engine.prune_system()),
        ];
        for (step, prune) in prunes {
            info!(step = %step, "running cleanup step");
            record(&mut outcome, step, prune.await)?;
        }

        Ok(outcome)
    }

    async fn stop_running(&self) -> EngineResult<()> {
        let ids = self.engine.list_active_workloads().await?;
        if ids.is_empty() {
            info!("no running containers to stop");
            return Ok(());
        }
        info!(count = ids.len(), "stopping running containers");
        self.engine.stop_workloads(&ids).await
    }
}

fn record(
    outcome: &mut CleanupOutcome,
    step: CleanupStep,
    result: EngineResult<()>,
) -> EngineResult<()> {
    match result {
        Ok(()) => {
            outcome.completed.push(step);
            Ok(())
        }
        Err(EngineError::Step { message, .. }) => {
            warn!(step = %step, error = %message, "cleanup step failed, continuing");
            outcome.failed.push(StepFailure { step, message });
            Ok(())
        }
        Err(fatal) => Err(fatal),
    }
}
