use std::io;
use std::time::Duration;

use stubrun_stub::{connect, AppResolver, CancelToken, Catalog, Session, StubConfig};
use stubrun_transport::Target;
use tracing::debug;

use crate::cmd::RunArgs;
use crate::exit::{resolve_error, stub_error, transport_error, CliError, CliResult, USAGE};
use crate::output::{print_outcome, OutputFormat};

pub fn run(args: RunArgs, format: OutputFormat) -> CliResult<i32> {
    let config = StubConfig {
        connect_attempts: args.connect_attempts,
        ack_timeout: parse_duration(&args.ack_timeout)?,
        read_timeout: Some(parse_duration(&args.read_timeout)?),
        ..StubConfig::default()
    };

    // Resolution failures are reported before any connection is attempted.
    let path = resolve_app(&args)?;

    let target: Target = args
        .target
        .parse()
        .map_err(|err| transport_error("invalid target", err))?;
    let stream = connect(&target, &config).map_err(|err| stub_error("connect failed", err))?;

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    if let Err(err) = ctrlc::set_handler(move || handler_token.cancel()) {
        debug!(%err, "could not install interrupt handler");
    }

    let mut session = Session::new(stream, io::stdout(), config, cancel);
    let outcome = session
        .run(&path, args.args.len())
        .map_err(|err| stub_error("run failed", err))?;

    print_outcome(&outcome, format);
    Ok(outcome.exit_status())
}

fn resolve_app(args: &RunArgs) -> CliResult<String> {
    if args.app.starts_with('/') {
        return Ok(args.app.clone());
    }

    let Some(catalog_path) = &args.catalog else {
        return Err(CliError::new(
            USAGE,
            format!(
                "'{}' is not an absolute path; pass --catalog to resolve it",
                args.app
            ),
        ));
    };

    let catalog =
        Catalog::load(catalog_path).map_err(|err| resolve_error("resolve failed", err))?;
    catalog
        .resolve(&args.app)
        .map_err(|err| resolve_error("resolve failed", err))
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}
