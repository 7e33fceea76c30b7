//! Non-blocking channel transport interface.
//!
//! This is the collaborator layer underneath chanproc. It defines what a
//! multiplexed channel backend must provide:
//! - a raw `exec` primitive that may report "would block"
//! - a raw `read` primitive over numbered substreams
//! - a session-scoped blocking-retry helper that absorbs "would block"
//!
//! Everything above this crate talks to backends only through
//! [`NativeChannel`] and [`BlockingRetry`].

pub mod error;
pub mod local;
pub mod outcome;
pub mod session;
pub mod substream;
pub mod traits;

pub use error::{Result, TransportError};
pub use local::{LocalChannel, DEFAULT_SHELL};
pub use outcome::{Attempt, ReadOutcome};
pub use session::{RetryPolicy, Session, DEFAULT_POLL_INTERVAL};
pub use substream::{substream_name, STDERR, STDOUT};
pub use traits::{BlockingRetry, NativeChannel};
