use chanproc_transport::TransportError;

use crate::state::ProcessState;

/// Errors that can occur while executing a command on a channel.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// Failure reported by the transport during dispatch or read.
    ///
    /// Carried as is: the message is the transport's own.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// `start` was called on a process that already left `Unstarted`.
    #[error("process already started (state: {0})")]
    AlreadyStarted(ProcessState),

    /// Captured output exceeded the configured limit.
    #[error("output too large ({size} bytes, max {max})")]
    OutputTooLarge { size: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, ChannelError>;
