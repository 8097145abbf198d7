// Shared test helpers: an in-memory engine that records every call

#![allow(dead_code)]

use async_trait::async_trait;
use dockprune::engine::{ContainerEngine, EngineError, EngineResult};
use dockprune::models::{CleanupStep, UsageEntry};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Ping,
    DiskUsage,
    ListActive,
    Stop(Vec<String>),
    PruneBuildCache,
    PruneContainers,
    PruneImages,
    PruneVolumes,
    PruneSystem,
}

#[derive(Debug, Clone, Copy)]
pub enum Fault {
    /// Daemon refuses the operation.
    Step,
    /// Daemon stops answering.
    Unavailable,
}

#[derive(Default)]
pub struct FakeEngine {
    calls: Mutex<Vec<Call>>,
    usage: Mutex<VecDeque<Vec<UsageEntry>>>,
    active: Vec<String>,
    faults: HashMap<CleanupStep, Fault>,
    ping_down: bool,
    usage_fault: Option<Fault>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one disk usage reading. The last reading repeats once the queue
    /// runs dry.
    pub fn with_usage(self, sizes: &[&str]) -> Self {
        let rows = sizes
            .iter()
            .enumerate()
            .map(|(i, s)| UsageEntry::new(format!("category-{i}"), *s))
            .collect();
        self.usage.lock().unwrap().push_back(rows);
        self
    }

    pub fn with_active(mut self, ids: &[&str]) -> Self {
        self.active = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn failing(mut self, step: CleanupStep, fault: Fault) -> Self {
        self.faults.insert(step, fault);
        self
    }

    pub fn ping_down(mut self) -> Self {
        self.ping_down = true;
        self
    }

    pub fn usage_failing(mut self, fault: Fault) -> Self {
        self.usage_fault = Some(fault);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn outcome(&self, step: CleanupStep) -> EngineResult<()> {
        match self.faults.get(&step) {
            None => Ok(()),
            Some(Fault::Step) => Err(EngineError::Step {
                step,
                message: format!("{step} refused by fake daemon"),
            }),
            Some(Fault::Unavailable) => Err(EngineError::Unavailable("fake daemon went away".into())),
        }
    }
}

#[async_trait]
impl ContainerEngine for FakeEngine {
    async fn ping(&self) -> EngineResult<()> {
        self.record(Call::Ping);
        if self.ping_down {
            return Err(EngineError::Unavailable("fake daemon not running".into()));
        }
        Ok(())
    }

    async fn disk_usage_breakdown(&self) -> EngineResult<Vec<UsageEntry>> {
        self.record(Call::DiskUsage);
        match self.usage_fault {
            Some(Fault::Step) => {
                return Err(EngineError::Step {
                    step: CleanupStep::PruneSystem,
                    message: "df refused".into(),
                });
            }
            Some(Fault::Unavailable) => {
                return Err(EngineError::Unavailable("df transport error".into()));
            }
            None => {}
        }
        let mut usage = self.usage.lock().unwrap();
        let rows = if usage.len() > 1 {
            usage.pop_front().unwrap_or_default()
        } else {
            usage.front().cloned().unwrap_or_default()
        };
        Ok(rows)
    }

    async fn list_active_workloads(&self) -> EngineResult<Vec<String>> {
        self.record(Call::ListActive);
        Ok(self.active.clone())
    }

    async fn stop_workloads(&self, ids: &[String]) -> EngineResult<()> {
        self.record(Call::Stop(ids.to_vec()));
        self.outcome(CleanupStep::StopRunning)
    }

    async fn prune_build_cache(&self) -> EngineResult<()> {
        self.record(Call::PruneBuildCache);
        self.outcome(CleanupStep::PruneBuildCache)
    }

    async fn prune_containers(&self) -> EngineResult<()> {
        self.record(Call::PruneContainers);
        self.outcome(CleanupStep::PruneContainers)
    }

    async fn prune_images(&self) -> EngineResult<()> {
        self.record(Call::PruneImages);
        self.outcome(CleanupStep::PruneImages)
    }

    async fn prune_volumes(&self) -> EngineResult<()> {
        self.record(Call::PruneVolumes);
        self.outcome(CleanupStep::PruneVolumes)
    }

    async fn prune_system(&self) -> EngineResult<()> {
        self.record(Call::PruneSystem);
        self.outcome(CleanupStep::PruneSystem)
    }
}

pub const ALL_PRUNES: [Call; 5] = [
    Call::PruneBuildCache,
    Call::PruneContainers,
    Call::PruneImages,
    Call::PruneVolumes,
    Call::PruneSystem,
];
