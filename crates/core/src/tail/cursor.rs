//! Mutable state of one tail-follow session.

/// Tracks a tail session's position in the remote log.
///
/// Retry bookkeeping lives here rather than in ambient counters so every
/// poll sees, and tests can assert on, the full session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailCursor {
    /// Read endpoint of the current log segment.
    pub target_url: String,

    /// Bytes already consumed from the current segment.
    pub offset: u64,

    /// Total range reads issued by this session.
    pub polls: u32,

    /// Consecutive not-ready responses since the last delivered chunk.
    pub not_ready: u32,
}

impl TailCursor {
    /// Create a cursor at the given offset.
    ///
    /// Pass offset 0 to read the segment from its beginning, or the
    /// segment's current size for tail-from-now semantics.
    pub fn new(target_url: impl Into<String>, offset: u64) -> Self {
        Self {
            target_url: target_url.into(),
            offset,
            polls: 0,
            not_ready: 0,
        }
    }

    /// Record a delivered chunk of `bytes` bytes.
    pub fn advance(&mut self, bytes: u64) {
        self.offset += bytes;
        self.not_ready = 0;
    }

    /// Switch to a rolled-over segment, adopting its current size as the
    /// new offset.
    pub fn roll_over(&mut self, target_url: impl Into<String>, size: u64) {
        self.target_url = target_url.into();
        self.offset = size;
        self.not_ready = 0;
    }
}
