use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Engine HTTP API over its local socket. It has no multi-container
    /// stop, so a forced run stops containers one request at a time.
    Api,
    /// The engine's command-line client, one subprocess per operation.
    #[default]
    Cli,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default)]
    pub transport: Transport,
    /// Unix socket for the api transport. Falls back to DOCKER_HOST, then
    /// the default socket.
    pub socket: Option<String>,
    /// Per-request timeout for the api transport. Prunes can be slow.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Client binary for the cli transport.
    #[serde(default = "default_binary")]
    pub binary: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            socket: None,
            timeout_secs: default_timeout_secs(),
            binary: default_binary(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_binary() -> String {
    "docker".into()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub color: ColorMode,
}

impl OutputConfig {
    /// Whether to emit styling. `auto` styles only a terminal and honors NO_COLOR.
    pub fn styled(&self, stderr_is_tty: bool) -> bool {
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => stderr_is_tty && std::env::var_os("NO_COLOR").is_none(),
        }
    }
}

impl AppConfig {
    /// Load from the file named by CONFIG_FILE; built-in defaults when unset.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var("CONFIG_FILE") {
            Ok(path) => {
                let s = std::fs::read_to_string(&path)
                    .map_err(|e| anyhow::anyhow!("config file {}: {}", path, e))?;
                Self::load_from_str(&s)
            }
            Err(_) => Ok(Self::default()),
        }
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.engine.timeout_secs > 0,
            "engine.timeout_secs must be > 0, got {}",
            self.engine.timeout_secs
        );
        anyhow::ensure!(
            !self.engine.binary.trim().is_empty(),
            "engine.binary must be non-empty"
        );
        if let Some(socket) = &self.engine.socket {
            anyhow::ensure!(
                !socket.trim().is_empty(),
                "engine.socket must be non-empty when set"
            );
        }
        Ok(())
    }
}
