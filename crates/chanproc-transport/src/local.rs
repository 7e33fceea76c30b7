//! Local channel backend.
//!
//! Runs commands through `/bin/sh -c` on this host and exposes the child's
//! stdout as substream 0 over a non-blocking pipe. Reads therefore report
//! genuine `EAGAIN` conditions, the same way a remote channel does while
//! its peer has not sent anything yet.

use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, ExitStatus};

use bytes::BytesMut;
use tracing::debug;

use crate::error::{Result, TransportError};
use crate::outcome::{Attempt, ReadOutcome};
use crate::substream::STDOUT;
use crate::traits::NativeChannel;

/// Shell used to interpret dispatched commands.
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// A channel whose "remote" end is a local shell process.
pub struct LocalChannel {
    shell: PathBuf,
    child: Option<Child>,
    stdout: Option<ChildStdout>,
    exit_status: Option<ExitStatus>,
}

impl LocalChannel {
    /// Open a channel that dispatches through [`DEFAULT_SHELL`].
    pub fn open() -> Self {
        Self::with_shell(DEFAULT_SHELL)
    }

    /// Open a channel that dispatches through an explicit shell.
    pub fn with_shell(shell: impl AsRef<Path>) -> Self {
        Self {
            shell: shell.as_ref().to_path_buf(),
            child: None,
            stdout: None,
            exit_status: None,
        }
    }

    /// Exit status of the dispatched command, or `None` before `exec`.
    ///
    /// Waits for the command to exit if it has not already been reaped. Call
    /// it after stdout reached end-of-stream; a command still writing into a
    /// full pipe never exits.
    pub fn exit_status(&mut self) -> Result<Option<ExitStatus>> {
        if self.exit_status.is_none() {
            if let Some(child) = self.child.as_mut() {
                let status = child.wait()?;
                debug!(pid = child.id(), ?status, "local command exited");
                self.exit_status = Some(status);
            }
        }
        Ok(self.exit_status)
    }

    /// OS process ID of the dispatched command, if any.
    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    // Closing stdout does not mean the command is done; only collect a status
    // that is already there.
    fn close_stdout(&mut self) -> Result<()> {
        self.stdout = None;
        if let Some(child) = self.child.as_mut() {
            if let Some(status) = child.try_wait()? {
                debug!(pid = child.id(), ?status, "local command exited");
                self.exit_status = Some(status);
            }
        }
        Ok(())
    }

    #[cfg(unix)]
    fn spawn(&mut self, command: &str) -> Result<()> {
        use std::process::{Command, Stdio};

        let mut child = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| TransportError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let stdout = child.stdout.take();
        debug!(pid = child.id(), shell = ?self.shell, "dispatched local command");
        self.child = Some(child);

        let stdout = stdout
            .ok_or_else(|| TransportError::Protocol("child stdout was not captured".into()))?;
        set_nonblocking(&stdout)?;
        self.stdout = Some(stdout);
        Ok(())
    }

    #[cfg(not(unix))]
    fn spawn(&mut self, command: &str) -> Result<()> {
        Err(TransportError::Spawn {
            command: command.to_string(),
            source: std::io::Error::new(
                ErrorKind::Unsupported,
                "local channel backend requires a Unix platform",
            ),
        })
    }
}

impl Default for LocalChannel {
    fn default() -> Self {
        Self::open()
    }
}

impl NativeChannel for LocalChannel {
    fn exec(&mut self, command: &str) -> Result<Attempt<()>> {
        if self.child.is_some() {
            return Err(TransportError::AlreadyDispatched);
        }
        self.spawn(command)?;
        Ok(Attempt::Ready(()))
    }

    fn read(&mut self, substream: u32, max_bytes: usize) -> Result<ReadOutcome> {
        if substream != STDOUT {
            return Err(TransportError::UnsupportedSubstream(substream));
        }
        if self.child.is_none() {
            return Err(TransportError::NotDispatched);
        }
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(ReadOutcome::EndOfStream);
        };

        let mut buf = BytesMut::zeroed(max_bytes.max(1));
        match stdout.read(&mut buf) {
            Ok(0) => {
                self.close_stdout()?;
                Ok(ReadOutcome::EndOfStream)
            }
            Ok(n) => {
                buf.truncate(n);
                Ok(ReadOutcome::Data(buf.freeze()))
            }
            Err(err) if err.kind() == ErrorKind::WouldBlock => Ok(ReadOutcome::WouldBlock),
            Err(err) if err.kind() == ErrorKind::Interrupted => Ok(ReadOutcome::WouldBlock),
            Err(err) => Err(TransportError::Io(err)),
        }
    }
}

impl Drop for LocalChannel {
    fn drop(&mut self) {
        if self.exit_status.is_some() {
            return;
        }
        if let Some(child) = self.child.as_mut() {
            debug!(pid = child.id(), "killing unfinished local command");
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl std::fmt::Debug for LocalChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalChannel")
            .field("shell", &self.shell)
            .field("pid", &self.pid())
            .field("exit_status", &self.exit_status)
            .finish()
    }
}

#[cfg(unix)]
fn set_nonblocking(stdout: &ChildStdout) -> Result<()> {
    use std::os::fd::AsRawFd;

    let fd = stdout.as_raw_fd();

    // SAFETY: `fd` is the open read end of the child's stdout pipe, owned by
    // `stdout` which outlives both calls.
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(std::io::Error::last_os_error().into());
    }

    // SAFETY: same descriptor as above; only the O_NONBLOCK status flag changes.
    let rc = unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) };
    if rc < 0 {
        return Err(std::io::Error::last_os_error().into());
    }
    Ok(())
}
