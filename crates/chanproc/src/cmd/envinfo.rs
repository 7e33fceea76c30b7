use std::collections::BTreeMap;

use chanproc_channel::DEFAULT_READ_CHUNK_SIZE;
use chanproc_transport::{DEFAULT_POLL_INTERVAL, DEFAULT_SHELL};
use serde::Serialize;

use crate::cmd::EnvinfoArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::OutputFormat;

#[derive(Serialize)]
struct PlatformInfo {
    os: String,
    arch: String,
}

#[derive(Serialize)]
struct EnvInfoOutput {
    schema_id: &'static str,
    version: String,
    target: String,
    rust_version: String,
    git_hash: String,
    platform: PlatformInfo,
    defaults: BTreeMap<String, String>,
    dependencies: BTreeMap<String, String>,
    environment: BTreeMap<String, Option<String>>,
}

pub fn run(_args: EnvinfoArgs, format: OutputFormat) -> CliResult<i32> {
    let mut deps = BTreeMap::new();
    deps.insert("clap".to_string(), "4.5".to_string());
    deps.insert("bytes".to_string(), "1".to_string());
    deps.insert("tracing".to_string(), "0.1".to_string());

    let mut defaults = BTreeMap::new();
    defaults.insert("shell".to_string(), DEFAULT_SHELL.to_string());
    defaults.insert(
        "read_chunk_size".to_string(),
        DEFAULT_READ_CHUNK_SIZE.to_string(),
    );
    defaults.insert(
        "poll_interval".to_string(),
        format!("{:?}", DEFAULT_POLL_INTERVAL),
    );

    let mut env = BTreeMap::new();
    env.insert(
        "CHANPROC_LOG_LEVEL".to_string(),
        std::env::var("CHANPROC_LOG_LEVEL").ok(),
    );
    env.insert("SHELL".to_string(), std::env::var("SHELL").ok());

    let output = EnvInfoOutput {
        schema_id: "https://schemas.3leaps.dev/chanproc/cli/v1/envinfo.schema.json",
        version: env!("CARGO_PKG_VERSION").to_string(),
        target: target_triple(),
        rust_version: option_env!("RUSTC_VERSION")
            .unwrap_or("unknown")
            .to_string(),
        git_hash: option_env!("GIT_HASH").unwrap_or("unknown").to_string(),
        platform: PlatformInfo {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        },
        defaults,
        dependencies: deps,
        environment: env,
    };

    print_envinfo(&output, format);
    Ok(SUCCESS)
}

fn target_triple() -> String {
    if let Some(target) = option_env!("CHANPROC_BUILD_TARGET") {
        return target.to_string();
    }

    match (std::env::consts::ARCH, std::env::consts::OS) {
        ("aarch64", "macos") => "aarch64-apple-darwin".to_string(),
        ("x86_64", "macos") => "x86_64-apple-darwin".to_string(),
        ("aarch64", "linux") => "aarch64-unknown-linux-gnu".to_string(),
        ("x86_64", "linux") => "x86_64-unknown-linux-gnu".to_string(),
        (arch, os) => format!("{arch}-unknown-{os}"),
    }
}

fn print_envinfo(output: &EnvInfoOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(output).unwrap_or_else(|_| "{}".to_string())
        ),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("chanproc environment\n");
            println!("  Version:    {}", output.version);
            println!("  Target:     {}", output.target);
            println!("  Rust:       {}", output.rust_version);
            println!("  Git hash:   {}", output.git_hash);
            println!(
                "  Platform:   {} ({})",
                output.platform.os, output.platform.arch
            );
            println!("\n  Defaults:");
            for (k, v) in &output.defaults {
                println!("    {:<16} {}", k, v);
            }
            println!("\n  Dependencies:");
            for (k, v) in &output.dependencies {
                println!("    {:<16} {}", k, v);
            }
            println!("\n  Environment:");
            for (k, v) in &output.environment {
                println!("    {:<20} {}", k, v.as_deref().unwrap_or("(not set)"));
            }
        }
        OutputFormat::Raw => println!("{}", output.version),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envinfo_json_has_schema_id() {
        let out = EnvInfoOutput {
            schema_id: "x",
            version: "0.1.0".to_string(),
            target: "a-b-c".to_string(),
            rust_version: "1.85.0".to_string(),
            git_hash: "abc".to_string(),
            platform: PlatformInfo {
                os: "linux".to_string(),
                arch: "x86_64".to_string(),
            },
            defaults: BTreeMap::new(),
            dependencies: BTreeMap::new(),
            environment: BTreeMap::new(),
        };

        let json = serde_json::to_string(&out).expect("envinfo output should serialize");
        assert!(json.contains("\"schema_id\""));
    }

    #[test]
    fn target_looks_like_triple() {
        let target = target_triple();
        assert!(target.split('-').count() >= 3);
    }
}
