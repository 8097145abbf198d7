// Command-line flags, resolved once into an immutable RunConfig

use crate::models::RunConfig;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{CommandFactory, Parser};
use std::ffi::OsString;

const KNOWN_FLAGS: [&str; 4] = ["-h", "--help", "--no-confirm", "--force"];

#[derive(Debug, Parser)]
#[command(
    name = "dockprune",
    about = "Prune unused Docker resources and report the disk space reclaimed.",
    before_help = concat!("dockprune ", env!("CARGO_PKG_VERSION")),
    after_help = "Environment:\n  CONFIG_FILE  optional TOML config file\n  RUST_LOG     log filter (default: info)",
    disable_version_flag = true,
    args_override_self = true
)]
struct Flags {
    /// Do not ask for confirmation before pruning
    #[arg(long)]
    no_confirm: bool,
    /// Stop all running containers first so their resources can be pruned too
    #[arg(long)]
    force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Help(String),
    Run(RunConfig),
}

#[derive(Debug, thiserror::Error)]
#[error("unknown option: {token}")]
pub struct UnknownArgument {
    pub token: String,
    pub usage: String,
}

pub fn usage() -> String {
    Flags::command().render_help().to_string()
}

/// Parse the full argv (program name first).
pub fn parse<I, T>(args: I) -> Result<Invocation, UnknownArgument>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    // clap reads a bare "--" as end of options; only the listed flags are valid.
    if let Some(token) = first_unknown(&args) {
        return Err(UnknownArgument {
            token,
            usage: usage(),
        });
    }
    match Flags::try_parse_from(&args) {
        Ok(flags) => Ok(Invocation::Run(RunConfig {
            skip_confirmation: flags.no_confirm,
            force_stop_running: flags.force,
        })),
        Err(e) if e.kind() == ErrorKind::DisplayHelp => Ok(Invocation::Help(usage())),
        Err(e) => Err(UnknownArgument {
            token: offending_token(&e, &args),
            usage: usage(),
        }),
    }
}

fn first_unknown(args: &[OsString]) -> Option<String> {
    args.iter()
        .skip(1)
        .map(|a| a.to_string_lossy().into_owned())
        .find(|a| !KNOWN_FLAGS.contains(&a.as_str()))
}

fn offending_token(err: &clap::Error, args: &[OsString]) -> String {
    if let Some(token) = first_unknown(args) {
        return token;
    }
    match err.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(s)) => s.clone(),
        _ => format!("{:?}", err.kind()),
    }
}
