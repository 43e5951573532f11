mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "stubrun",
    version,
    about = "Run an app on a tethered development device"
)]
struct Cli {
    /// Output format for command results.
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    format: OutputFormat,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    match cmd::run(cli.command, cli.format) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_subcommand_with_parameters() {
        let cli = Cli::try_parse_from([
            "stubrun",
            "run",
            "127.0.0.1:3222",
            "com.example.demo",
            "--catalog",
            "/tmp/apps.json",
            "--",
            "-v",
            "extra",
        ])
        .expect("run args should parse");

        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.target, "127.0.0.1:3222");
                assert_eq!(args.app, "com.example.demo");
                assert_eq!(args.args, vec!["-v", "extra"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_resolve_subcommand() {
        let cli = Cli::try_parse_from([
            "stubrun",
            "resolve",
            "Alpha",
            "--catalog",
            "/tmp/apps.json",
        ])
        .expect("resolve args should parse");
        assert!(matches!(cli.command, Command::Resolve(_)));
    }

    #[test]
    fn resolve_requires_catalog() {
        let err = Cli::try_parse_from(["stubrun", "resolve", "Alpha"])
            .expect_err("missing --catalog should fail");
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn parses_global_log_flags() {
        let cli = Cli::try_parse_from([
            "stubrun",
            "--log-level",
            "debug",
            "--log-format",
            "json",
            "version",
        ])
        .expect("global flags should parse");
        assert!(matches!(cli.command, Command::Version(_)));
    }
}
