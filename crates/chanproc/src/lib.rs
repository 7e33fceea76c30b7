//! Command execution over multiplexed, non-blocking channels.
//!
//! chanproc runs one command per channel of a transport session and captures
//! its stdout, hiding the transport's "would block" retries behind a
//! synchronous call.
//!
//! # Crate Structure
//!
//! - [`transport`] — Backend interface, session retry helper, local backend
//! - [`channel`] — `Channel` and `Process` lifecycle

/// Re-export transport types.
pub mod transport {
    pub use chanproc_transport::*;
}

/// Re-export channel types.
pub mod channel {
    pub use chanproc_channel::*;
}
