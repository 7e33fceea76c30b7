use std::sync::Arc;
use std::time::{Duration, Instant};

use chanproc_channel::{Channel, ProcessConfig};
use chanproc_transport::{LocalChannel, RetryPolicy, Session};
use tracing::debug;

use crate::cmd::ExecArgs;
use crate::exit::{channel_error, transport_error, CliError, CliResult, FAILURE, SUCCESS, USAGE};
use crate::output::{print_exec, ExecReport, OutputFormat};

pub fn run(args: ExecArgs, format: OutputFormat) -> CliResult<i32> {
    let policy = retry_policy(&args)?;
    let config = process_config(&args)?;

    let session = Arc::new(Session::new(policy));
    debug!(policy = ?session.policy(), "session opened");
    let mut channel = Channel::new(
        LocalChannel::with_shell(&args.shell),
        Arc::clone(&session),
    )
    .with_config(config);

    let started = Instant::now();
    let process = channel
        .execute(&args.command)
        .map_err(|err| channel_error("exec failed", err))?;
    let elapsed_ms = started.elapsed().as_millis();

    let state = process.state();
    let chunks = process.chunks_read();
    let output = process.into_data();
    let exit_code = channel
        .native_mut()
        .exit_status()
        .map_err(|err| transport_error("exec failed", err))?
        .and_then(|status| status.code());
    session.close();
    debug!(?exit_code, bytes = output.len(), "exec finished");

    let report = ExecReport {
        command: &args.command,
        state: state.as_str(),
        output: &output,
        chunks,
        exit_code,
        would_block_retries: session.would_block_count(),
        elapsed_ms,
    };
    print_exec(&report, format);

    if args.propagate_exit {
        Ok(exit_code.unwrap_or(FAILURE))
    } else {
        Ok(SUCCESS)
    }
}

fn retry_policy(args: &ExecArgs) -> CliResult<RetryPolicy> {
    let timeout = args.timeout.as_deref().map(parse_duration).transpose()?;
    if args.max_attempts == Some(0) {
        return Err(CliError::new(USAGE, "--max-attempts must be greater than zero"));
    }
    Ok(RetryPolicy {
        poll_interval: parse_duration(&args.poll_interval)?,
        timeout,
        max_attempts: args.max_attempts,
    })
}

fn process_config(args: &ExecArgs) -> CliResult<ProcessConfig> {
    if args.chunk_size == 0 {
        return Err(CliError::new(USAGE, "--chunk-size must be greater than zero"));
    }
    Ok(ProcessConfig {
        read_chunk_size: args.chunk_size,
        max_output: args.max_output,
    })
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
