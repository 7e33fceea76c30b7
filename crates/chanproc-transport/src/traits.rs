use crate::error::Result;
use crate::outcome::{Attempt, ReadOutcome};

/// Raw primitives of one multiplexed channel.
///
/// Implementations are non-blocking: any call may report that no progress was
/// possible. Releasing the underlying handle is the implementor's `Drop`.
pub trait NativeChannel {
    /// Dispatch a command on the channel.
    ///
    /// May need several calls (driven by [`BlockingRetry`]) before the command
    /// is fully dispatched. The command string is opaque to this layer.
    fn exec(&mut self, command: &str) -> Result<Attempt<()>>;

    /// Read up to `max_bytes` from a numbered substream.
    fn read(&mut self, substream: u32, max_bytes: usize) -> Result<ReadOutcome>;
}

impl<C: NativeChannel + ?Sized> NativeChannel for Box<C> {
    fn exec(&mut self, command: &str) -> Result<Attempt<()>> {
        (**self).exec(command)
    }

    fn read(&mut self, substream: u32, max_bytes: usize) -> Result<ReadOutcome> {
        (**self).read(substream, max_bytes)
    }
}

/// Session-scoped helper that turns non-blocking attempts into blocking calls.
///
/// `blocking_retry` never hands `WouldBlock` back to its caller: it either
/// yields the ready value, an error from the action, or an error of its own
/// (session closed, timeout, attempts exhausted).
pub trait BlockingRetry {
    /// Run `action` until it is ready or fails.
    fn blocking_retry<T, F>(&self, action: F) -> Result<T>
    where
        F: FnMut() -> Result<Attempt<T>>;
}
