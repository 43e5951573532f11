use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod resolve;
pub mod run;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload argv, launch an app, and monitor it to completion.
    Run(RunArgs),
    /// Resolve an app to its on-device executable path.
    Resolve(ResolveArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Run(args) => run::run(args, format),
        Command::Resolve(args) => resolve::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Debug-stub endpoint (host:port, or unix:/path/to/socket).
    pub target: String,

    /// App bundle id, display name, or absolute on-device executable path.
    pub app: String,

    /// App parameters, given after `--`. They are counted in the argv
    /// upload, but only the executable path itself is transmitted.
    #[arg(last = true)]
    pub args: Vec<String>,

    /// Installed-app catalog for resolving bundle ids and names.
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Connection attempts against the monitoring service.
    #[arg(long, default_value_t = 3)]
    pub connect_attempts: u32,

    /// Lock-step acknowledgment deadline (e.g. 10s, 500ms).
    #[arg(long, default_value = "10s")]
    pub ack_timeout: String,

    /// Stream read timeout; bounds Ctrl-C responsiveness (e.g. 1s).
    #[arg(long, default_value = "1s")]
    pub read_timeout: String,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// App bundle id or display name; omit to list the whole catalog.
    pub app: Option<String>,

    /// Installed-app catalog file.
    #[arg(long, value_name = "FILE")]
    pub catalog: PathBuf,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
