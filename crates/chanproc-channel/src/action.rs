//! Deferred start actions.
//!
//! A [`Process`](crate::Process) stores its start action at construction and
//! only runs it from `start`, so building a process never performs I/O.

use chanproc_transport::{BlockingRetry, NativeChannel};

use crate::channel::Channel;
use crate::error::Result;

/// Work a process performs on its channel when started.
pub trait StartAction<C, S> {
    /// Perform the action. Called at most once per process.
    fn run(&mut self, channel: &mut Channel<C, S>) -> Result<()>;

    /// The command this action dispatches.
    fn command(&self) -> &str;
}

/// Dispatches one command through the session's blocking-retry helper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecAction {
    command: String,
}

impl ExecAction {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl<C: NativeChannel, S: BlockingRetry> StartAction<C, S> for ExecAction {
    fn run(&mut self, channel: &mut Channel<C, S>) -> Result<()> {
        channel.exec_blocking(&self.command)
    }

    fn command(&self) -> &str {
        &self.command
    }
}
