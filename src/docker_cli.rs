// Docker command-line client transport: one subprocess per operation

use crate::engine::{ContainerEngine, EngineError, EngineResult};
use crate::models::{CleanupStep, UsageEntry};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Go template for `system df`; a real tab separates the two columns.
const DF_FORMAT: &str = "{{.Type}}\t{{.Size}}";

pub struct DockerCli {
    binary: String,
}

impl DockerCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Run one engine command and return its stdout. `step` is `None` for
    /// queries, whose failures always mean the engine is unusable.
    async fn run(&self, step: Option<CleanupStep>, args: &[&str]) -> EngineResult<String> {
        debug!(binary = %self.binary, ?args, "running engine command");
        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    EngineError::Missing(format!("`{}` not found in PATH", self.binary))
                }
                _ => EngineError::Unavailable(format!("failed to run `{}`: {e}", self.binary)),
            })?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let message = if stderr.is_empty() {
            format!("`{} {}` exited with {}", self.binary, args.join(" "), output.status)
        } else {
            stderr
        };
        Err(classify_failure(step, message))
    }
}

#[async_trait]
impl ContainerEngine for DockerCli {
    async fn ping(&self) -> EngineResult<()> {
        self.run(None, &["info", "--format", "{{.ServerVersion}}"])
            .await
            .map(|_| ())
    }

    async fn disk_usage_breakdown(&self) -> EngineResult<Vec<UsageEntry>> {
        let out = self
            .run(None, &["system", "df", "--format", DF_FORMAT])
            .await?;
        Ok(parse_df(&out))
    }

    async fn list_active_workloads(&self) -> EngineResult<Vec<String>> {
        let out = self
            .run(Some(CleanupStep::StopRunning), &["ps", "-q", "--no-trunc"])
            .await?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn stop_workloads(&self, ids: &[String]) -> EngineResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let mut args = vec!["stop"];
        args.extend(ids.iter().map(String::as_str));
        self.run(Some(CleanupStep::StopRunning), &args)
            .await
            .map(|_| ())
    }

    async fn prune_build_cache(&self) -> EngineResult<()> {
        self.run(
            Some(CleanupStep::PruneBuildCache),
            &["builder", "prune", "--all", "--force"],
        )
        .await
        .map(|_| ())
    }

    async fn prune_containers(&self) -> EngineResult<()> {
        self.run(
            Some(CleanupStep::PruneContainers),
            &["container", "prune", "--force"],
        )
        .await
        .map(|_| ())
    }

    async fn prune_images(&self) -> EngineResult<()> {
        self.run(
            Some(CleanupStep::PruneImages),
            &["image", "prune", "--all", "--force"],
        )
        .await
        .map(|_| ())
    }

    async fn prune_volumes(&self) -> EngineResult<()> {
        self.run(
            Some(CleanupStep::PruneVolumes),
            &["volume", "prune", "--all", "--force"],
        )
        .await
        .map(|_| ())
    }

    async fn prune_system(&self) -> EngineResult<()> {
        self.run(
            Some(CleanupStep::PruneSystem),
            &["system", "prune", "--all", "--force", "--volumes"],
        )
        .await
        .map(|_| ())
    }
}

/// Parse `Type<TAB>Size` lines. Lines without a tab are kept with an empty
/// category so their size still counts.
pub(crate) fn parse_df(stdout: &str) -> Vec<UsageEntry> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|line| match line.split_once('\t') {
            Some((category, size)) => UsageEntry::new(category.trim(), size.trim()),
            None => UsageEntry::new("", line),
        })
        .collect()
}

fn daemon_unreachable(stderr: &str) -> bool {
    let s = stderr.to_ascii_lowercase();
    s.contains("cannot connect to the docker daemon")
        || s.contains("is the docker daemon running")
        || s.contains("error during connect")
        || s.contains("connection refused")
}

pub(crate) fn classify_failure(step: Option<CleanupStep>, message: String) -> EngineError {
    match step {
        Some(step) if !daemon_unreachable(&message) => EngineError::Step { step, message },
        _ => EngineError::Unavailable(message),
    }
}
