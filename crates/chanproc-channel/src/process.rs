use bytes::{Bytes, BytesMut};
use chanproc_transport::{BlockingRetry, NativeChannel, Session, STDOUT};
use tracing::{debug, trace};

use crate::action::{ExecAction, StartAction};
use crate::channel::Channel;
use crate::error::{ChannelError, Result};
use crate::state::ProcessState;

/// One command execution on a [`Channel`].
///
/// Constructed `Unstarted` with its start action stored. [`Process::start`]
/// runs the action, then reads the stdout substream until end-of-stream,
/// appending every chunk to the captured output.
#[derive(Debug)]
pub struct Process<'c, C, S = Session, A = ExecAction> {
    channel: &'c mut Channel<C, S>,
    action: A,
    state: ProcessState,
    data: BytesMut,
    chunks_read: usize,
}

impl<'c, C, S, A> Process<'c, C, S, A>
where
    C: NativeChannel,
    S: BlockingRetry,
    A: StartAction<C, S>,
{
    /// Bind `action` to `channel`. Performs no I/O.
    pub fn new(channel: &'c mut Channel<C, S>, action: A) -> Self {
        Self {
            channel,
            action,
            state: ProcessState::Unstarted,
            data: BytesMut::new(),
            chunks_read: 0,
        }
    }

    /// Run the start action and capture stdout to end-of-stream.
    ///
    /// Only valid in `Unstarted`. On failure the process moves to `Failed`
    /// and anything captured so far is discarded.
    pub fn start(&mut self) -> Result<()> {
        if self.state != ProcessState::Unstarted {
            return Err(ChannelError::AlreadyStarted(self.state));
        }

        self.transition(ProcessState::Running);
        match self.run() {
            Ok(()) => {
                self.transition(ProcessState::Completed);
                Ok(())
            }
            Err(err) => {
                debug!(error = %err, "process failed");
                self.data.clear();
                self.transition(ProcessState::Failed);
                Err(err)
            }
        }
    }

    fn run(&mut self) -> Result<()> {
        self.action.run(&mut *self.channel)?;
        self.read_to_end()
    }

    fn read_to_end(&mut self) -> Result<()> {
        let chunk_size = self.channel.config().effective_chunk_size();
        let max_output = self.channel.config().max_output;

        while let Some(chunk) = self.channel.read_blocking(STDOUT, chunk_size)? {
            let size = self.data.len() + chunk.len();
            if let Some(max) = max_output {
                if size > max {
                    return Err(ChannelError::OutputTooLarge { size, max });
                }
            }

            self.chunks_read += 1;
            trace!(len = chunk.len(), total = size, "read stdout chunk");
            self.data.extend_from_slice(&chunk);
        }

        trace!(total = self.data.len(), "stdout reached end of stream");
        Ok(())
    }

    fn transition(&mut self, next: ProcessState) {
        debug!(from = %self.state, to = %next, "process state change");
        self.state = next;
    }

    /// The command this process dispatches.
    pub fn command(&self) -> &str {
        self.action.command()
    }
}

impl<'c, C, S, A> Process<'c, C, S, A> {
    /// Captured stdout.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the process and take the captured stdout.
    pub fn into_data(self) -> Bytes {
        self.data.freeze()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// Number of non-empty chunks appended to the output.
    pub fn chunks_read(&self) -> usize {
        self.chunks_read
    }
}
