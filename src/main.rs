use crossterm::tty::IsTty;
use dockprune::cli::{self, Invocation};
use dockprune::config::{AppConfig, Transport};
use dockprune::confirm::{ConfirmationGate, TtyInput};
use dockprune::docker_cli::DockerCli;
use dockprune::docker_repo::DockerRepo;
use dockprune::engine::ContainerEngine;
use dockprune::models::RunConfig;
use dockprune::orchestrator::{Orchestrator, RunOutcome};
use dockprune::report;
use dockprune::style::{Tone, paint};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cfg = match cli::parse(std::env::args_os()) {
        Ok(Invocation::Run(cfg)) => cfg,
        Ok(Invocation::Help(text)) => {
            eprint!("{text}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{e}\n");
            eprint!("{}", e.usage);
            return ExitCode::FAILURE;
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let app_config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    let styled = app_config.output.styled(std::io::stderr().is_tty());

    match run(cfg, &app_config, styled).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", paint("error:", Tone::Danger, styled));
            ExitCode::FAILURE
        }
    }
}

async fn run(cfg: RunConfig, app_config: &AppConfig, styled: bool) -> anyhow::Result<ExitCode> {
    let engine: Box<dyn ContainerEngine> = match app_config.engine.transport {
        Transport::Api => Box::new(DockerRepo::connect(
            app_config.engine.socket.as_deref(),
            app_config.engine.timeout_secs,
        )?),
        Transport::Cli => Box::new(DockerCli::new(app_config.engine.binary.clone())),
    };
    tracing::debug!(transport = ?app_config.engine.transport, ?cfg, "starting cleanup run");

    let gate = ConfirmationGate::new(TtyInput::new(), std::io::stderr(), styled);
    let orchestrator = Orchestrator::new(engine.as_ref(), cfg);

    match orchestrator.run_until(gate, shutdown_signal()).await? {
        RunOutcome::Completed { report, .. } => {
            eprint!("{}", report::render(&report, styled));
            Ok(ExitCode::SUCCESS)
        }
        RunOutcome::Declined => {
            eprintln!("Cleanup cancelled, nothing was removed.");
            Ok(ExitCode::SUCCESS)
        }
        RunOutcome::Interrupted => {
            eprintln!(
                "\n{}",
                paint(
                    "Interrupted: no further cleanup steps will run.",
                    Tone::Danger,
                    styled
                )
            );
            // A prompt read may still be parked on a blocking thread, and the
            // runtime waits for those on shutdown. Leave immediately instead.
            std::process::exit(1);
        }
    }
}

/// Resolves on ctrl-c or SIGTERM. Never resolves if no handler can be installed.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    if tokio::signal::ctrl_c().await.is_err() {
                        std::future::pending::<()>().await;
                    }
                    return;
                }
            };
        let ctrl_c = async {
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        };
        tokio::select! {
            _ = ctrl_c => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
