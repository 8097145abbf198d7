// Per-invocation run flags

/// Flags resolved once from the command line; never mutated afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunConfig {
    /// Skip the confirmation prompt (`--no-confirm`).
    pub skip_confirmation: bool,
    /// Stop running containers before pruning (`--force`).
    pub force_stop_running: bool,
}
