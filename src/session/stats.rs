use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Statistics about a recording session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Whether recording is currently active
    pub is_recording: bool,

    /// When the session was created
    pub started_at: DateTime<Utc>,

    /// Total duration in seconds
    pub duration_secs: f64,

    /// Segments cut so far (including the trailing partial after stop)
    pub segments_produced: usize,

    /// Segments whose transcription reached the transcript
    pub segments_delivered: usize,

    /// Segments dropped after a failed backend call
    pub segments_failed: usize,

    /// Segments still waiting in the delivery queue
    pub segments_queued: usize,
}
