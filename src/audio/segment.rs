use chrono::{DateTime, Utc};
use std::time::Duration;

use super::device::AudioFormat;

/// An immutable, finished audio segment.
///
/// Produced exactly once per chunk boundary (plus one trailing partial on
/// stop). Ownership moves from the recorder to the delivery queue on
/// enqueue and is released by the drain worker once the backend call
/// settles.
#[derive(Debug, Clone)]
pub struct SegmentRef {
    /// Monotonically increasing, gap-free sequence number (0-indexed).
    /// Used for ordering diagnostics; correctness does not depend on it
    /// because delivery is strictly sequential.
    pub sequence: u64,

    /// Encoded audio (WAV container)
    pub data: Vec<u8>,

    /// Capture format of the underlying stream
    pub format: AudioFormat,

    /// When the segment was cut
    pub captured_at: DateTime<Utc>,

    /// Measured stop-to-restart hand-off time at this segment's tail
    /// boundary. Best-effort gaplessness is observable here rather than
    /// assumed; `Duration::ZERO` for the final segment of a session.
    pub handoff: Duration,
}

impl SegmentRef {
    /// Upload filename for this segment
    pub fn file_name(&self) -> String {
        format!("chunk-{:05}.wav", self.sequence)
    }
}
