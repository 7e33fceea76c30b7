use std::sync::Arc;

use bytes::Bytes;
use chanproc_transport::{BlockingRetry, NativeChannel, ReadOutcome, Session};
use tracing::{debug, info};

use crate::action::ExecAction;
use crate::config::ProcessConfig;
use crate::error::Result;
use crate::process::Process;

/// One multiplexed channel over a transport session.
///
/// Owns the native channel handle exclusively; the handle is released when
/// the `Channel` is dropped. The session is shared with every other channel
/// opened on it.
#[derive(Debug)]
pub struct Channel<C, S = Session> {
    native: C,
    session: Arc<S>,
    config: ProcessConfig,
}

impl<C: NativeChannel, S: BlockingRetry> Channel<C, S> {
    /// Wrap a native channel opened on `session`.
    pub fn new(native: C, session: Arc<S>) -> Self {
        Self {
            native,
            session,
            config: ProcessConfig::default(),
        }
    }

    /// Override the configuration used for processes started on this channel.
    pub fn with_config(mut self, config: ProcessConfig) -> Self {
        self.config = config;
        self
    }

    /// Execute `command` and capture its stdout.
    ///
    /// Returns once the command has been dispatched and its output read to
    /// end-of-stream. The command string is passed to the remote side
    /// untouched. Transport failures are returned as reported.
    pub fn execute(&mut self, command: &str) -> Result<Process<'_, C, S>> {
        info!(command, "executing command");
        let mut process = self.prepare(command);
        process.start()?;
        debug!(
            bytes = process.data().len(),
            chunks = process.chunks_read(),
            "command output captured"
        );
        Ok(process)
    }

    /// Build an unstarted process for `command` without performing any I/O.
    pub fn prepare(&mut self, command: &str) -> Process<'_, C, S> {
        Process::new(self, ExecAction::new(command))
    }

    /// The underlying native channel.
    pub fn native(&self) -> &C {
        &self.native
    }

    /// Mutable access to the underlying native channel.
    ///
    /// Calling raw primitives directly bypasses the process lifecycle; the
    /// channel's behavior afterwards is up to the caller.
    pub fn native_mut(&mut self) -> &mut C {
        &mut self.native
    }

    /// The session this channel belongs to.
    pub fn session(&self) -> &Arc<S> {
        &self.session
    }

    /// Current process configuration.
    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }

    pub(crate) fn exec_blocking(&mut self, command: &str) -> Result<()> {
        let Self {
            native, session, ..
        } = self;
        session.blocking_retry(|| native.exec(command))?;
        debug!("command dispatched");
        Ok(())
    }

    /// Read the next chunk, or `None` at end-of-stream.
    pub(crate) fn read_blocking(
        &mut self,
        substream: u32,
        max_bytes: usize,
    ) -> Result<Option<Bytes>> {
        let Self {
            native, session, ..
        } = self;
        let chunk = session.blocking_retry(|| {
            native
                .read(substream, max_bytes)
                .map(ReadOutcome::into_attempt)
        })?;
        Ok(chunk)
    }
}
