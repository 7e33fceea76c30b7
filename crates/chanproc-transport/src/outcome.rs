//! Tagged results of single non-blocking attempts.
//!
//! "No data yet" and "stream ended" are distinct variants here. Backends must
//! never encode either one as an empty successful read.

use bytes::Bytes;

/// Result of one non-blocking attempt that either completed or must be retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<T> {
    /// The operation made progress and produced a value.
    Ready(T),
    /// No progress was possible right now; the caller should retry.
    WouldBlock,
}

/// Result of one non-blocking read on a channel substream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Bytes read from the substream.
    ///
    /// An empty payload carries no would-block signal and therefore means the
    /// same thing as [`ReadOutcome::EndOfStream`].
    Data(Bytes),
    /// No data available yet, the substream is still open.
    WouldBlock,
    /// The remote side closed the substream.
    EndOfStream,
}

impl ReadOutcome {
    /// Fold the three-way read result into a retryable attempt.
    ///
    /// `Ready(Some(bytes))` carries data, `Ready(None)` marks end-of-stream.
    pub fn into_attempt(self) -> Attempt<Option<Bytes>> {
        match self {
            ReadOutcome::Data(bytes) if bytes.is_empty() => Attempt::Ready(None),
            ReadOutcome::Data(bytes) => Attempt::Ready(Some(bytes)),
            ReadOutcome::WouldBlock => Attempt::WouldBlock,
            ReadOutcome::EndOfStream => Attempt::Ready(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_data_is_end_of_stream() {
        let outcome = ReadOutcome::Data(Bytes::new());
        assert_eq!(outcome.into_attempt(), Attempt::Ready(None));
    }

    #[test]
    fn would_block_stays_retryable() {
        assert_eq!(ReadOutcome::WouldBlock.into_attempt(), Attempt::WouldBlock);
    }

    #[test]
    fn data_is_carried_through() {
        let attempt = ReadOutcome::Data(Bytes::from_static(b"abc")).into_attempt();
        assert_eq!(attempt, Attempt::Ready(Some(Bytes::from_static(b"abc"))));
    }
}
