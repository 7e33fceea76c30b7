/// Default number of bytes requested per substream read.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 4096;

/// Configuration for processes started on a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessConfig {
    /// Bytes requested per read. Values below 1 are treated as 1.
    pub read_chunk_size: usize,
    /// Upper bound on captured output. `None` captures everything.
    pub max_output: Option<usize>,
}

impl ProcessConfig {
    pub(crate) fn effective_chunk_size(&self) -> usize {
        self.read_chunk_size.max(1)
    }
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
            max_output: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_chunk_size_is_clamped() {
        let cfg = ProcessConfig {
            read_chunk_size: 0,
            ..ProcessConfig::default()
        };
        assert_eq!(cfg.effective_chunk_size(), 1);
        assert_eq!(ProcessConfig::default().effective_chunk_size(), 4096);
    }
}
