// Administrative API of the container engine, independent of transport

use crate::models::{CleanupStep, UsageEntry};
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// No engine client or endpoint is present at all.
    #[error("container engine not found: {0}")]
    Missing(String),
    /// The engine exists but its daemon is not responding.
    #[error("container engine unavailable: {0}")]
    Unavailable(String),
    /// The daemon answered, but refused or failed one operation.
    #[error("{step} failed: {message}")]
    Step { step: CleanupStep, message: String },
}

impl EngineError {
    /// Missing or unavailable engines end the run; step failures do not.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, EngineError::Step { .. })
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Operations the cleanup workflow needs from the engine. Each call is one
/// logical administrative request; callers never issue two concurrently.
#[async_trait]
pub trait ContainerEngine: Send + Sync {
    /// Liveness check. Failure means the engine is unavailable.
    async fn ping(&self) -> EngineResult<()>;

    /// Per-category disk usage as size strings, e.g. ("Volumes", "2.1GB").
    async fn disk_usage_breakdown(&self) -> EngineResult<Vec<UsageEntry>>;

    /// IDs of running containers.
    async fn list_active_workloads(&self) -> EngineResult<Vec<String>>;

    /// Stop all given containers as one logical operation. The cli transport
    /// sends a single `stop id...`; the api transport stops them in order.
    async fn stop_workloads(&self, ids: &[String]) -> EngineResult<()>;

    /// Remove all build cache, not just dangling entries.
    async fn prune_build_cache(&self) -> EngineResult<()>;

    /// Remove stopped containers.
    async fn prune_containers(&self) -> EngineResult<()>;

    /// Remove all images not used by a container.
    async fn prune_images(&self) -> EngineResult<()>;

    /// Remove all volumes not used by a container.
    async fn prune_volumes(&self) -> EngineResult<()>;

    /// Catch-all sweep: containers, networks, all images, build cache, volumes.
    async fn prune_system(&self) -> EngineResult<()>;
}
