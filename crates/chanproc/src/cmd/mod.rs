use clap::{Args, Subcommand};
use std::path::PathBuf;

use chanproc_channel::DEFAULT_READ_CHUNK_SIZE;
use chanproc_transport::DEFAULT_SHELL;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod doctor;
pub mod envinfo;
pub mod exec;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a command on a fresh channel and print its captured stdout.
    Exec(ExecArgs),
    /// Show version information.
    Version(VersionArgs),
    /// Run local environment health checks.
    Doctor(DoctorArgs),
    /// Print build and environment diagnostics.
    Envinfo(EnvinfoArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Exec(args) => exec::run(args, format),
        Command::Version(args) => version::run(args),
        Command::Doctor(args) => doctor::run(args, format),
        Command::Envinfo(args) => envinfo::run(args, format),
    }
}

#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Command line, passed to the channel's shell untouched.
    pub command: String,
    /// Give up when a single dispatch or read stays blocked this long (e.g. 30s, 500ms).
    #[arg(long)]
    pub timeout: Option<String>,
    /// Pause between retries of a blocked operation.
    #[arg(long, default_value = "1ms")]
    pub poll_interval: String,
    /// Give up after this many attempts of a single blocked operation.
    #[arg(long)]
    pub max_attempts: Option<u64>,
    /// Bytes requested per stdout read.
    #[arg(long, default_value_t = DEFAULT_READ_CHUNK_SIZE)]
    pub chunk_size: usize,
    /// Fail when captured stdout exceeds this many bytes.
    #[arg(long)]
    pub max_output: Option<usize>,
    /// Shell used by the local channel backend.
    #[arg(long, default_value = DEFAULT_SHELL)]
    pub shell: PathBuf,
    /// Exit with the command's own exit status instead of 0.
    #[arg(long)]
    pub propagate_exit: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Args, Debug, Default)]
pub struct DoctorArgs {}

#[derive(Args, Debug, Default)]
pub struct EnvinfoArgs {}
