use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::error::{Result, TransportError};
use crate::outcome::Attempt;
use crate::traits::BlockingRetry;

/// Default pause between attempts that reported "would block".
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// How long and how often [`Session::blocking_retry`] keeps retrying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Pause between attempts. Zero yields the thread instead of sleeping.
    pub poll_interval: Duration,
    /// Wall-clock budget for one blocking call. `None` retries forever.
    pub timeout: Option<Duration>,
    /// Attempt budget for one blocking call. `None` retries forever.
    pub max_attempts: Option<u64>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
            max_attempts: None,
        }
    }
}

/// An established transport session shared by its channels.
///
/// Channels hold it through an `Arc`. Every attempt made through
/// [`BlockingRetry::blocking_retry`] runs under a session-wide lock, so
/// channels sharing one session never touch the connection concurrently.
#[derive(Debug, Default)]
pub struct Session {
    policy: RetryPolicy,
    closed: AtomicBool,
    io_lock: Mutex<()>,
    would_block: AtomicU64,
}

impl Session {
    /// Create an open session with the given retry policy.
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            closed: AtomicBool::new(false),
            io_lock: Mutex::new(()),
            would_block: AtomicU64::new(0),
        }
    }

    /// Retry policy applied to every blocking call.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Mark the session closed. Later blocking calls fail with
    /// [`TransportError::SessionClosed`].
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!("session closed");
        }
    }

    /// Returns true once [`Session::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Total number of "would block" results absorbed by this session.
    pub fn would_block_count(&self) -> u64 {
        self.would_block.load(Ordering::Relaxed)
    }

    fn pause(&self) {
        if self.policy.poll_interval.is_zero() {
            std::thread::yield_now();
        } else {
            std::thread::sleep(self.policy.poll_interval);
        }
    }
}

impl BlockingRetry for Session {
    fn blocking_retry<T, F>(&self, mut action: F) -> Result<T>
    where
        F: FnMut() -> Result<Attempt<T>>,
    {
        let started = Instant::now();
        let mut attempts: u64 = 0;

        loop {
            if self.is_closed() {
                return Err(TransportError::SessionClosed);
            }

            attempts += 1;
            let attempt = {
                let _guard = self.io_lock.lock().unwrap_or_else(PoisonError::into_inner);
                action()?
            };

            match attempt {
                Attempt::Ready(value) => {
                    if attempts > 1 {
                        trace!(attempts, "operation ready after retry");
                    }
                    return Ok(value);
                }
                Attempt::WouldBlock => {
                    self.would_block.fetch_add(1, Ordering::Relaxed);

                    if let Some(max) = self.policy.max_attempts {
                        if attempts >= max {
                            debug!(attempts, "retry budget exhausted");
                            return Err(TransportError::RetriesExhausted { attempts });
                        }
                    }
                    if let Some(timeout) = self.policy.timeout {
                        if started.elapsed() >= timeout {
                            debug!(?timeout, attempts, "blocking call timed out");
                            return Err(TransportError::Timeout(timeout));
                        }
                    }

                    trace!(attempts, "would block, retrying");
                    self.pause();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            poll_interval: Duration::ZERO,
            ..RetryPolicy::default()
        }
    }

    #[test]
    fn default_policy_retries_forever() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.poll_interval, DEFAULT_POLL_INTERVAL);
        assert!(policy.timeout.is_none());
        assert!(policy.max_attempts.is_none());
    }

    #[test]
    fn retries_until_ready() {
        let session = Session::new(fast_policy());
        let mut calls = 0;

        let value = session
            .blocking_retry(|| {
                calls += 1;
                if calls < 5 {
                    Ok(Attempt::WouldBlock)
                } else {
                    Ok(Attempt::Ready(calls))
                }
            })
            .unwrap();

        assert_eq!(value, 5);
        assert_eq!(session.would_block_count(), 4);
    }

    #[test]
    fn error_is_returned_without_retry() {
        let session = Session::new(fast_policy());
        let mut calls = 0;

        let err = session
            .blocking_retry::<(), _>(|| {
                calls += 1;
                Err(TransportError::Protocol("bad packet".to_string()))
            })
            .unwrap_err();

        assert_eq!(calls, 1);
        assert!(matches!(err, TransportError::Protocol(msg) if msg == "bad packet"));
    }

    #[test]
    fn closed_session_rejects_before_action() {
        let session = Session::new(fast_policy());
        session.close();
        assert!(session.is_closed());

        let mut called = false;
        let err = session
            .blocking_retry(|| {
                called = true;
                Ok(Attempt::Ready(()))
            })
            .unwrap_err();

        assert!(!called);
        assert!(matches!(err, TransportError::SessionClosed));
    }

    #[test]
    fn close_mid_retry_stops_the_loop() {
        let session = Arc::new(Session::new(fast_policy()));
        let closer = Arc::clone(&session);
        let mut calls = 0;

        let err = session
            .blocking_retry::<(), _>(|| {
                calls += 1;
                if calls == 3 {
                    closer.close();
                }
                Ok(Attempt::WouldBlock)
            })
            .unwrap_err();

        assert_eq!(calls, 3);
        assert!(matches!(err, TransportError::SessionClosed));
    }

    #[test]
    fn max_attempts_bounds_the_retry() {
        let session = Session::new(RetryPolicy {
            max_attempts: Some(3),
            ..fast_policy()
        });
        let mut calls = 0;

        let err = session
            .blocking_retry::<(), _>(|| {
                calls += 1;
                Ok(Attempt::WouldBlock)
            })
            .unwrap_err();

        assert_eq!(calls, 3);
        assert!(matches!(err, TransportError::RetriesExhausted { attempts: 3 }));
    }

    #[test]
    fn timeout_bounds_the_retry() {
        let session = Session::new(RetryPolicy {
            poll_interval: Duration::from_millis(2),
            timeout: Some(Duration::from_millis(20)),
            max_attempts: None,
        });

        let started = Instant::now();
        let err = session
            .blocking_retry::<(), _>(|| Ok(Attempt::WouldBlock))
            .unwrap_err();

        assert!(started.elapsed() >= Duration::from_millis(20));
        assert!(matches!(err, TransportError::Timeout(d) if d == Duration::from_millis(20)));
    }

    #[test]
    fn attempts_are_serialized_across_threads() {
        let session = Arc::new(Session::new(fast_policy()));
        let active = Arc::new(AtomicU64::new(0));

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let session = Arc::clone(&session);
                let active = Arc::clone(&active);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        session
                            .blocking_retry(|| {
                                let inside = active.fetch_add(1, Ordering::SeqCst);
                                assert_eq!(inside, 0, "attempts must not overlap");
                                std::thread::yield_now();
                                active.fetch_sub(1, Ordering::SeqCst);
                                Ok(Attempt::Ready(()))
                            })
                            .unwrap();
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }
    }
}
