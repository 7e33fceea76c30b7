use std::fmt;
use std::io;

use chanproc_channel::ChannelError;
use chanproc_transport::TransportError;

// Exit code constants aligned with rsfulmen/DDR-0002 semantics.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const HEALTH_CHECK_FAILED: i32 = 30;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound | io::ErrorKind::Unsupported => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Io(source) => io_error(context, source),
        TransportError::Spawn { ref source, .. } => {
            let code = match source.kind() {
                io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
                _ => FAILURE,
            };
            CliError::new(code, format!("{context}: {err}"))
        }
        TransportError::Timeout(_) | TransportError::RetriesExhausted { .. } => {
            CliError::new(TIMEOUT, format!("{context}: {err}"))
        }
        TransportError::UnsupportedSubstream(_) => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn channel_error(context: &str, err: ChannelError) -> CliError {
    match err {
        ChannelError::Transport(err) => transport_error(context, err),
        ChannelError::OutputTooLarge { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        ChannelError::AlreadyStarted(_) => CliError::new(INTERNAL, format!("{context}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn timeout_maps_to_124() {
        let err = channel_error(
            "exec failed",
            ChannelError::Transport(TransportError::Timeout(Duration::from_secs(1))),
        );
        assert_eq!(err.code, TIMEOUT);
        assert!(err.message.starts_with("exec failed: "));
    }

    #[test]
    fn output_limit_maps_to_data_invalid() {
        let err = channel_error(
            "exec failed",
            ChannelError::OutputTooLarge { size: 10, max: 4 },
        );
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn missing_shell_maps_to_failure() {
        let err = transport_error(
            "exec failed",
            TransportError::Spawn {
                command: "true".to_string(),
                source: io::Error::from(io::ErrorKind::NotFound),
            },
        );
        assert_eq!(err.code, FAILURE);
        assert!(err.message.contains("`true`"));
    }

    #[test]
    fn closed_session_is_a_transport_error() {
        let err = transport_error("exec failed", TransportError::SessionClosed);
        assert_eq!(err.code, TRANSPORT_ERROR);
    }
}
