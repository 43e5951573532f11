use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use stubrun_stub::{AppRecord, RunOutcome};
use tracing::info;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct OutcomeOutput<'a> {
    kind: &'a str,
    exit_status: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    signal: Option<u8>,
}

/// Report how the run ended.
///
/// Text mode keeps stdout byte-faithful to the monitored app and logs the
/// summary instead; JSON mode emits a single trailing summary line.
pub fn print_outcome(outcome: &RunOutcome, format: OutputFormat) {
    match format {
        OutputFormat::Text => match outcome {
            RunOutcome::Exited(code) => info!(code, "process exited"),
            RunOutcome::Signaled(signal) => info!(signal, "process terminated by signal"),
        },
        OutputFormat::Json => {
            let out = match outcome {
                RunOutcome::Exited(_) => OutcomeOutput {
                    kind: "exited",
                    exit_status: outcome.exit_status(),
                    signal: None,
                },
                RunOutcome::Signaled(signal) => OutcomeOutput {
                    kind: "signaled",
                    exit_status: outcome.exit_status(),
                    signal: Some(*signal),
                },
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
    }
}

#[derive(Serialize)]
struct ResolvedOutput<'a> {
    query: &'a str,
    path: &'a str,
}

pub fn print_resolved(query: &str, path: &str, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{path}"),
        OutputFormat::Json => {
            let out = ResolvedOutput { query, path };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
    }
}

pub fn print_catalog(records: &[AppRecord], format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["BUNDLE ID", "NAME", "EXECUTABLE"]);
            for record in records {
                table.add_row(vec![
                    record.bundle_id.clone(),
                    record.display_name.clone(),
                    format!(
                        "{}/{}",
                        record.path.trim_end_matches('/'),
                        record.executable
                    ),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(records).unwrap_or_else(|_| "[]".to_string())
            );
        }
    }
}
