use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chanproc_channel::Channel;
use chanproc_transport::{LocalChannel, RetryPolicy, Session, DEFAULT_SHELL};
use serde::Serialize;

use crate::cmd::DoctorArgs;
use crate::exit::{CliResult, HEALTH_CHECK_FAILED, SUCCESS};
use crate::output::OutputFormat;

const ROUNDTRIP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Pass,
    Fail,
    Info,
    Skip,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    detail: String,
}

#[derive(Debug, Serialize)]
struct DoctorOutput {
    schema_id: &'static str,
    checks: Vec<CheckResult>,
    overall: &'static str,
}

pub fn run(_args: DoctorArgs, format: OutputFormat) -> CliResult<i32> {
    let checks = vec![
        platform_backend_check(),
        shell_check(Path::new(DEFAULT_SHELL)),
        local_roundtrip_check(),
        log_level_check(),
    ];

    let has_fail = checks.iter().any(|c| matches!(c.status, CheckStatus::Fail));
    let overall = if has_fail { "fail" } else { "pass" };

    let output = DoctorOutput {
        schema_id: "https://schemas.3leaps.dev/chanproc/cli/v1/doctor-report.schema.json",
        checks,
        overall,
    };

    print_doctor(&output, format);

    if has_fail {
        Ok(HEALTH_CHECK_FAILED)
    } else {
        Ok(SUCCESS)
    }
}

fn print_doctor(output: &DoctorOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(output).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("chanproc doctor\n");
            for c in &output.checks {
                println!(
                    "  [{:>4}] {:<18} {}",
                    status_text(c.status),
                    c.name,
                    c.detail
                );
            }
            if output.overall == "pass" {
                println!("\n  Result: all checks passed");
            } else {
                println!("\n  Result: one or more checks failed");
            }
        }
        OutputFormat::Raw => {
            println!("{}", output.overall);
        }
    }
}

fn status_text(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "PASS",
        CheckStatus::Fail => "FAIL",
        CheckStatus::Info => "INFO",
        CheckStatus::Skip => "SKIP",
    }
}

fn platform_backend_check() -> CheckResult {
    let (status, detail) = if cfg!(unix) {
        (CheckStatus::Pass, "local channel backend available")
    } else {
        (
            CheckStatus::Fail,
            "local channel backend requires a Unix platform",
        )
    };
    CheckResult {
        name: "platform_backend".to_string(),
        status,
        detail: detail.to_string(),
    }
}

fn shell_check(shell: &Path) -> CheckResult {
    let (status, detail) = if shell.is_file() {
        (CheckStatus::Pass, format!("{} present", shell.display()))
    } else {
        (CheckStatus::Fail, format!("{} not found", shell.display()))
    };
    CheckResult {
        name: "shell".to_string(),
        status,
        detail,
    }
}

fn local_roundtrip_check() -> CheckResult {
    if !cfg!(unix) {
        return CheckResult {
            name: "local_roundtrip".to_string(),
            status: CheckStatus::Skip,
            detail: "local backend unavailable on this platform".to_string(),
        };
    }

    let session = Arc::new(Session::new(RetryPolicy {
        timeout: Some(ROUNDTRIP_TIMEOUT),
        ..RetryPolicy::default()
    }));
    let mut channel = Channel::new(LocalChannel::open(), session);

    let (status, detail) = match channel.execute("echo chanproc-doctor") {
        Ok(process) if process.data() == b"chanproc-doctor\n" => (
            CheckStatus::Pass,
            "exec and stdout capture succeeded".to_string(),
        ),
        Ok(process) => (
            CheckStatus::Fail,
            format!("unexpected output ({} bytes)", process.data().len()),
        ),
        Err(err) => (CheckStatus::Fail, format!("exec failed: {err}")),
    };
    CheckResult {
        name: "local_roundtrip".to_string(),
        status,
        detail,
    }
}

fn log_level_check() -> CheckResult {
    match std::env::var("CHANPROC_LOG_LEVEL") {
        Ok(value) => CheckResult {
            name: "log_level".to_string(),
            status: CheckStatus::Info,
            detail: format!("CHANPROC_LOG_LEVEL={value}"),
        },
        Err(_) => CheckResult {
            name: "log_level".to_string(),
            status: CheckStatus::Skip,
            detail: "CHANPROC_LOG_LEVEL not set".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doctor_output_has_overall_status() {
        let checks = vec![CheckResult {
            name: "x".to_string(),
            status: CheckStatus::Pass,
            detail: "ok".to_string(),
        }];
        let output = DoctorOutput {
            schema_id: "x",
            checks,
            overall: "pass",
        };
        let json = serde_json::to_string(&output).expect("doctor output should serialize");
        assert!(json.contains("\"overall\":\"pass\""));
    }

    #[test]
    fn missing_shell_fails() {
        let result = shell_check(Path::new("/nonexistent/chanproc-shell"));
        assert!(matches!(result.status, CheckStatus::Fail));
    }

    #[test]
    #[cfg(unix)]
    fn local_roundtrip_passes() {
        let result = local_roundtrip_check();
        assert!(matches!(result.status, CheckStatus::Pass), "{}", result.detail);
    }
}
