//! Command execution over multiplexed channels.
//!
//! A [`Channel`] wraps one native channel of a transport session. Calling
//! [`Channel::execute`] dispatches a command and returns a [`Process`] whose
//! stdout has already been read to end-of-stream:
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use chanproc_channel::Channel;
//! use chanproc_transport::{LocalChannel, Session};
//!
//! let session = Arc::new(Session::default());
//! let mut channel = Channel::new(LocalChannel::open(), session);
//! let process = channel.execute("echo hello")?;
//! assert_eq!(process.data(), b"hello\n");
//! # Ok::<(), chanproc_channel::ChannelError>(())
//! ```
//!
//! "Would block" from the transport never reaches the caller. It is retried
//! by the session's blocking-retry helper for both the dispatch and every
//! read.

pub mod action;
pub mod channel;
pub mod config;
pub mod error;
pub mod process;
pub mod state;

pub use action::{ExecAction, StartAction};
pub use chanproc_transport::{substream_name, STDERR, STDOUT};
pub use channel::Channel;
pub use config::{ProcessConfig, DEFAULT_READ_CHUNK_SIZE};
pub use error::{ChannelError, Result};
pub use process::Process;
pub use state::ProcessState;
