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
    name = "chanproc",
    version,
    about = "Run commands over non-blocking channels"
)]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "warn",
        env = "CHANPROC_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
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
    fn parses_exec_subcommand() {
        let cli = Cli::try_parse_from([
            "chanproc",
            "exec",
            "echo hello",
            "--timeout",
            "5s",
            "--chunk-size",
            "1024",
        ])
        .expect("exec args should parse");

        assert!(matches!(cli.command, Command::Exec(_)));
    }

    #[test]
    fn rejects_missing_command() {
        let err = Cli::try_parse_from(["chanproc", "exec"]).expect_err("command is required");
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn parses_global_format_after_subcommand() {
        let cli = Cli::try_parse_from(["chanproc", "exec", "true", "--format", "raw"])
            .expect("global format should parse");
        assert!(matches!(cli.format, Some(OutputFormat::Raw)));
    }
}
