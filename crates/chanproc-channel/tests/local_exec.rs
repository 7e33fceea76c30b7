#![cfg(unix)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use chanproc_channel::{Channel, ChannelError, ProcessConfig, ProcessState};
use chanproc_transport::{LocalChannel, RetryPolicy, Session, TransportError};

fn local_channel(session: &Arc<Session>) -> Channel<LocalChannel> {
    Channel::new(LocalChannel::open(), Arc::clone(session))
}

#[test]
fn echo_hello_over_local_channel() {
    let session = Arc::new(Session::default());
    let mut channel = local_channel(&session);

    let process = channel.execute("echo hello").expect("echo should run");
    assert_eq!(process.data(), b"hello\n");
    assert_eq!(process.state(), ProcessState::Completed);
    drop(process);

    let status = channel
        .native_mut()
        .exit_status()
        .expect("wait should succeed")
        .expect("command was dispatched");
    assert!(status.success());
}

#[test]
fn large_output_is_captured_completely() {
    let session = Arc::new(Session::default());
    let mut channel = local_channel(&session);

    let expected: String = (1..=20_000).map(|n| format!("{n}\n")).collect();
    let process = channel.execute("seq 1 20000").expect("seq should run");

    assert_eq!(process.data(), expected.as_bytes());
    assert!(process.chunks_read() > 1);
}

#[test]
fn delayed_output_survives_would_block() {
    let session = Arc::new(Session::default());
    let mut channel = local_channel(&session);

    let output = channel
        .execute("sleep 0.2; printf late")
        .expect("delayed command should run")
        .into_data();

    assert_eq!(output.as_ref(), b"late");
    assert!(session.would_block_count() > 0);
}

#[test]
fn non_zero_exit_still_completes() {
    let session = Arc::new(Session::default());
    let mut channel = local_channel(&session);

    let process = channel
        .execute("echo partial; exit 1")
        .expect("stdout capture does not depend on exit status");
    assert_eq!(process.data(), b"partial\n");
    drop(process);

    let status = channel.native_mut().exit_status().expect("wait should succeed");
    assert_eq!(status.and_then(|s| s.code()), Some(1));
}

#[test]
fn channels_share_one_session() {
    let session = Arc::new(Session::default());
    let mut first = local_channel(&session);
    let mut second = local_channel(&session);

    let a = first.execute("printf one").expect("first").into_data();
    let b = second.execute("printf two").expect("second").into_data();

    assert_eq!(a.as_ref(), b"one");
    assert_eq!(b.as_ref(), b"two");
}

#[test]
fn small_chunks_reassemble() {
    let session = Arc::new(Session::default());
    let mut channel = local_channel(&session).with_config(ProcessConfig {
        read_chunk_size: 3,
        ..ProcessConfig::default()
    });

    let process = channel
        .execute("printf 'abcdefghij'")
        .expect("printf should run");
    assert_eq!(process.data(), b"abcdefghij");
    assert!(process.chunks_read() >= 4);
}

#[test]
fn session_timeout_surfaces_as_transport_error() {
    let session = Arc::new(Session::new(RetryPolicy {
        timeout: Some(Duration::from_millis(100)),
        ..RetryPolicy::default()
    }));
    let mut channel = local_channel(&session);

    let err = channel.execute("sleep 5").unwrap_err();
    assert!(matches!(
        err,
        ChannelError::Transport(TransportError::Timeout(_))
    ));
}

#[test]
fn closed_stdout_completes_before_command_exits() {
    let session = Arc::new(Session::new(RetryPolicy {
        timeout: Some(Duration::from_millis(200)),
        ..RetryPolicy::default()
    }));
    let mut channel = local_channel(&session);

    let started = Instant::now();
    let output = channel
        .execute("echo hi; exec 1>&-; sleep 3")
        .expect("stdout closed early")
        .into_data();

    assert_eq!(output.as_ref(), b"hi\n");
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn spawn_failure_propagates() {
    let session = Arc::new(Session::default());
    let mut channel = Channel::new(
        LocalChannel::with_shell("/nonexistent/chanproc-shell"),
        session,
    );

    let err = channel.execute("echo unreachable").unwrap_err();
    assert!(matches!(
        err,
        ChannelError::Transport(TransportError::Spawn { .. })
    ));
}
