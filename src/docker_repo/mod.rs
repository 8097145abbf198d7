// Docker engine API transport via bollard

mod df;

use crate::engine::{ContainerEngine, EngineError, EngineResult};
use crate::models::{CleanupStep, UsageEntry};
use async_trait::async_trait;
use bollard::Docker;
use bollard::query_parameters::{
    DataUsageOptions, ListContainersOptions, PruneBuildOptionsBuilder, PruneContainersOptions,
    PruneImagesOptions, PruneNetworksOptions, PruneVolumesOptions, StopContainerOptions,
};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Default engine socket when neither config nor DOCKER_HOST names one.
pub const DEFAULT_SOCKET: &str = "/var/run/docker.sock";

pub struct DockerRepo {
    docker: Docker,
}

impl DockerRepo {
    /// Connect to the engine socket. Only checks that an endpoint exists;
    /// reachability is established by `ping`.
    pub fn connect(socket: Option<&str>, timeout_secs: u64) -> EngineResult<Self> {
        let docker = match socket {
            Some(path) => {
                ensure_socket(path)?;
                Docker::connect_with_unix(path, timeout_secs, bollard::API_DEFAULT_VERSION)
            }
            None if std::env::var_os("DOCKER_HOST").is_some() => Docker::connect_with_defaults()
                .map(|d| d.with_timeout(Duration::from_secs(timeout_secs))),
            None => {
                ensure_socket(DEFAULT_SOCKET)?;
                Docker::connect_with_unix(DEFAULT_SOCKET, timeout_secs, bollard::API_DEFAULT_VERSION)
            }
        }
        .map_err(|e| EngineError::Missing(e.to_string()))?;
        Ok(Self { docker })
    }

    async fn prune_build_cache_as(&self, step: CleanupStep) -> EngineResult<()> {
        let options = PruneBuildOptionsBuilder::default().all(true).build();
        let res = self
            .docker
            .prune_build(Some(options))
            .await
            .map_err(|e| classify(step, e))?;
        debug!(step = %step, reclaimed = ?res.space_reclaimed, "build cache pruned");
        Ok(())
    }

    async fn prune_containers_as(&self, step: CleanupStep) -> EngineResult<()> {
        let res = self
            .docker
            .prune_containers(None::<PruneContainersOptions>)
            .await
            .map_err(|e| classify(step, e))?;
        debug!(step = %step, reclaimed = ?res.space_reclaimed, "containers pruned");
        Ok(())
    }

    async fn prune_images_as(&self, step: CleanupStep) -> EngineResult<()> {
        // dangling=false widens the prune to every unused image.
        let mut filters = HashMap::new();
        filters.insert("dangling".to_string(), vec!["false".to_string()]);
        let options = PruneImagesOptions {
            filters: Some(filters),
            ..Default::default()
        };
        let res = self
            .docker
            .prune_images(Some(options))
            .await
            .map_err(|e| classify(step, e))?;
        debug!(step = %step, reclaimed = ?res.space_reclaimed, "images pruned");
        Ok(())
    }

    async fn prune_volumes_as(&self, step: CleanupStep) -> EngineResult<()> {
        // Without all=true the engine only removes anonymous volumes.
        let mut filters = HashMap::new();
        filters.insert("all".to_string(), vec!["true".to_string()]);
        let options = PruneVolumesOptions {
            filters: Some(filters),
            ..Default::default()
        };
        let res = self
            .docker
            .prune_volumes(Some(options))
            .await
            .map_err(|e| classify(step, e))?;
        debug!(step = %step, reclaimed = ?res.space_reclaimed, "volumes pruned");
        Ok(())
    }

    async fn prune_networks_as(&self, step: CleanupStep) -> EngineResult<()> {
        self.docker
            .prune_networks(None::<PruneNetworksOptions>)
            .await
            .map_err(|e| classify(step, e))?;
        Ok(())
    }
}

#[async_trait]
impl ContainerEngine for DockerRepo {
    async fn ping(&self) -> EngineResult<()> {
        self.docker
            .ping()
            .await
            .map(|_| ())
            .map_err(|e| EngineError::Unavailable(e.to_string()))
    }

    async fn disk_usage_breakdown(&self) -> EngineResult<Vec<UsageEntry>> {
        let usage = self
            .docker
            .df(None::<DataUsageOptions>)
            .await
            .map_err(|e| EngineError::Unavailable(e.to_string()))?;
        Ok(df::breakdown(&usage))
    }

    async fn list_active_workloads(&self) -> EngineResult<Vec<String>> {
        let mut filters = HashMap::new();
        filters.insert("status".to_string(), vec!["running".to_string()]);

        let filter = ListContainersOptions {
            all: false,
            filters: Some(filters),
            ..Default::default()
        };

        let containers = self
            .docker
            .list_containers(Some(filter))
            .await
            .map_err(|e| classify(CleanupStep::StopRunning, e))?;
        Ok(containers.into_iter().filter_map(|c| c.id).collect())
    }

    async fn stop_workloads(&self, ids: &[String]) -> EngineResult<()> {
        // The HTTP API has no multi-container stop; one call per ID, in order.
        let mut failures = Vec::new();
        for id in ids {
            match self
                .docker
                .stop_container(id, None::<StopContainerOptions>)
                .await
            {
                Ok(()) => debug!(container = %id, "container stopped"),
                Err(e) => match classify(CleanupStep::StopRunning, e) {
                    EngineError::Step { message, .. } => {
                        warn!(container = %id, error = %message, "container stop failed");
                        failures.push(format!("{id}: {message}"));
                    }
                    fatal => return Err(fatal),
                },
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(EngineError::Step {
                step: CleanupStep::StopRunning,
                message: failures.join("; "),
            })
        }
    }

    async fn prune_build_cache(&self) -> EngineResult<()> {
        self.prune_build_cache_as(CleanupStep::PruneBuildCache).await
    }

    async fn prune_containers(&self) -> EngineResult<()> {
        self.prune_containers_as(CleanupStep::PruneContainers).await
    }

    async fn prune_images(&self) -> EngineResult<()> {
        self.prune_images_as(CleanupStep::PruneImages).await
    }

    async fn prune_volumes(&self) -> EngineResult<()> {
        self.prune_volumes_as(CleanupStep::PruneVolumes).await
    }

    async fn prune_system(&self) -> EngineResult<()> {
        // Same order as `docker system prune -a --volumes`; keep going past
        // refused sub-prunes, stop on transport failure.
        let step = CleanupStep::PruneSystem;
        let mut failures = Vec::new();
        tolerate(&mut failures, self.prune_containers_as(step).await)?;
        tolerate(&mut failures, self.prune_networks_as(step).await)?;
        tolerate(&mut failures, self.prune_images_as(step).await)?;
        tolerate(&mut failures, self.prune_build_cache_as(step).await)?;
        tolerate(&mut failures, self.prune_volumes_as(step).await)?;
        if failures.is_empty() {
            Ok(())
        } else {
            Err(EngineError::Step {
                step,
                message: failures.join("; "),
            })
        }
    }
}

/// Record a refused sub-operation and carry on; pass fatal errors through.
fn tolerate(failures: &mut Vec<String>, result: EngineResult<()>) -> EngineResult<()> {
    match result {
        Err(EngineError::Step { message, .. }) => {
            failures.push(message);
            Ok(())
        }
        other => other,
    }
}

fn ensure_socket(path: &str) -> EngineResult<()> {
    if Path::new(path).exists() {
        Ok(())
    } else {
        Err(EngineError::Missing(format!("no engine socket at {path}")))
    }
}

/// Daemon-side error responses are per-step failures; anything else means
/// the daemon could not be talked to.
fn classify(step: CleanupStep, err: bollard::errors::Error) -> EngineError {
    match err {
        bollard::errors::Error::DockerResponseServerError { message, .. } => {
            EngineError::Step { step, message }
        }
        other => EngineError::Unavailable(other.to_string()),
    }
}
