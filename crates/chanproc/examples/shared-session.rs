//! Shared session example — several channels multiplexed over one session.
//!
//! Each channel runs its own command; the session serializes their I/O and
//! applies one retry policy to all of them.
//!
//! Run with:
//!   cargo run --example shared-session

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chanproc::channel::Channel;
use chanproc::transport::{LocalChannel, RetryPolicy, Session};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let session = Arc::new(Session::new(RetryPolicy {
        timeout: Some(Duration::from_secs(10)),
        ..RetryPolicy::default()
    }));

    let workers: Vec<_> = ["sleep 0.3; echo slow", "echo fast", "seq 1 3"]
        .into_iter()
        .map(|command| {
            let session = Arc::clone(&session);
            thread::spawn(
                move || -> Result<(String, Vec<u8>), chanproc::channel::ChannelError> {
                    let mut channel = Channel::new(LocalChannel::open(), session);
                    let output = channel.execute(command)?.into_data();
                    Ok((command.to_string(), output.to_vec()))
                },
            )
        })
        .collect();

    for worker in workers {
        let (command, output) = worker.join().expect("worker should not panic")?;
        eprintln!("[{command}] {}", String::from_utf8_lossy(&output).trim_end());
    }

    session.close();
    eprintln!("would-block retries: {}", session.would_block_count());
    Ok(())
}
