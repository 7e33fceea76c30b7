use std::time::Duration;

/// Errors that can occur in channel transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// An I/O error occurred on the underlying channel.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend failed to start the requested command.
    #[error("failed to dispatch `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    /// A read was attempted before any command was dispatched.
    #[error("no command dispatched on channel")]
    NotDispatched,

    /// The channel already carries a dispatched command.
    #[error("command already dispatched on channel")]
    AlreadyDispatched,

    /// The backend does not expose the requested substream.
    #[error("substream {0} not supported by channel")]
    UnsupportedSubstream(u32),

    /// The owning session has been closed.
    #[error("session closed")]
    SessionClosed,

    /// The blocking-retry helper ran out of time.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// The blocking-retry helper ran out of attempts.
    #[error("operation still blocked after {attempts} attempts")]
    RetriesExhausted { attempts: u64 },

    /// The remote side violated the channel protocol.
    #[error("protocol error: {0}")]
    Protocol(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;
