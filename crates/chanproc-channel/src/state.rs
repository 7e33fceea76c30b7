use std::fmt;

/// Lifecycle of a [`Process`](crate::Process).
///
/// ```text
/// Unstarted ──start──▶ Running ──▶ Completed
///                          └─────▶ Failed
/// ```
///
/// There is no transition out of `Completed` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessState {
    /// Constructed, no I/O performed yet.
    Unstarted,
    /// Command dispatched or being dispatched; output is being read.
    Running,
    /// Output read to end-of-stream.
    Completed,
    /// Dispatch or read failed; captured output was discarded.
    Failed,
}

impl ProcessState {
    pub fn as_str(self) -> &'static str {
        match self {
            ProcessState::Unstarted => "unstarted",
            ProcessState::Running => "running",
            ProcessState::Completed => "completed",
            ProcessState::Failed => "failed",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_lowercase() {
        assert_eq!(ProcessState::Completed.to_string(), "completed");
        assert_eq!(ProcessState::Unstarted.to_string(), "unstarted");
    }
}
