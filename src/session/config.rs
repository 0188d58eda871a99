use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::audio::AudioFormat;

/// Configuration for a recording session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Unique session identifier (e.g., "session-2026-08-29-standup")
    pub session_id: String,

    /// Duration of each audio chunk before it is cut and delivered
    /// Default: 6 seconds
    pub chunk_duration: Duration,

    /// Capture format (Whisper expects 16kHz mono)
    pub format: AudioFormat,

    /// Whether the host's permission prompt flow has granted microphone
    /// access. Starting without it fails with `PermissionDenied`.
    pub permission_granted: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("session-{}", uuid::Uuid::new_v4()),
            chunk_duration: Duration::from_millis(6000),
            format: AudioFormat::default(),
            permission_granted: true,
        }
    }
}
