//! Substream IDs within a channel's data flow.
//!
//! Substream 0 carries a process's primary output. Substream 1 carries
//! auxiliary (error) output and is not read by chanproc.

/// Primary output (stdout).
pub const STDOUT: u32 = 0;

/// Auxiliary output (stderr).
pub const STDERR: u32 = 1;

/// Returns a human-readable name for a substream ID.
pub fn substream_name(id: u32) -> &'static str {
    match id {
        STDOUT => "STDOUT",
        STDERR => "STDERR",
        _ => "EXTENDED",
    }
}
