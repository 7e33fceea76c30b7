//! Run one command on a local channel and print its captured stdout.
//!
//! Run with:
//!   cargo run --example run-command -- 'uname -a'

use std::sync::Arc;

use chanproc::channel::Channel;
use chanproc::transport::{LocalChannel, Session};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let command = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "echo hello".to_string());

    let session = Arc::new(Session::default());
    let mut channel = Channel::new(LocalChannel::open(), Arc::clone(&session));

    let process = channel.execute(&command)?;
    eprintln!(
        "[{}] {} bytes in {} chunks",
        process.state(),
        process.data().len(),
        process.chunks_read()
    );
    print!("{}", String::from_utf8_lossy(process.data()));
    drop(process);

    let status = channel.native_mut().exit_status()?;
    eprintln!(
        "exit status: {:?}, would-block retries: {}",
        status,
        session.would_block_count()
    );
    Ok(())
}
