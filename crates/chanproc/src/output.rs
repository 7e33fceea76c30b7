use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Summary of one completed `exec`.
#[derive(Debug)]
pub struct ExecReport<'a> {
    pub command: &'a str,
    pub state: &'a str,
    pub output: &'a [u8],
    pub chunks: usize,
    pub exit_code: Option<i32>,
    pub would_block_retries: u64,
    pub elapsed_ms: u128,
}

#[derive(Serialize)]
struct ExecOutput<'a> {
    schema_id: &'a str,
    command: &'a str,
    state: &'a str,
    output_size: usize,
    chunks: usize,
    exit_code: Option<i32>,
    would_block_retries: u64,
    elapsed_ms: u128,
    output: String,
    timestamp: String,
}

pub fn print_exec(report: &ExecReport<'_>, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ExecOutput {
                schema_id: "https://schemas.3leaps.dev/chanproc/cli/v1/exec-result.schema.json",
                command: report.command,
                state: report.state,
                output_size: report.output.len(),
                chunks: report.chunks,
                exit_code: report.exit_code,
                would_block_retries: report.would_block_retries,
                elapsed_ms: report.elapsed_ms,
                output: output_preview(report.output),
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["COMMAND", "STATE", "SIZE", "EXIT", "OUTPUT"])
                .add_row(vec![
                    report.command.to_string(),
                    report.state.to_string(),
                    report.output.len().to_string(),
                    exit_text(report.exit_code),
                    output_preview(report.output),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "command={:?} state={} size={} chunks={} exit={} elapsed={}ms",
                report.command,
                report.state,
                report.output.len(),
                report.chunks,
                exit_text(report.exit_code),
                report.elapsed_ms
            );
            print_raw(report.output);
        }
        OutputFormat::Raw => {
            print_raw(report.output);
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn exit_text(code: Option<i32>) -> String {
    code.map_or_else(|| "-".to_string(), |c| c.to_string())
}

fn output_preview(output: &[u8]) -> String {
    match std::str::from_utf8(output) {
        Ok(text) => text.to_string(),
        Err(_) => format!("<binary {} bytes>", output.len()),
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
