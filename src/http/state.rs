use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::analysis::TextAnalyzer;
use crate::audio::{AudioFormat, CaptureDevice};
use crate::delivery::TranscriptionBackend;
use crate::session::SessionController;

/// Defaults applied to sessions started over the API
#[derive(Clone)]
pub struct SessionDefaults {
    pub chunk_duration: Duration,
    pub format: AudioFormat,
}

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Active recording sessions (session_id -> controller)
    pub sessions: Arc<RwLock<HashMap<String, Arc<SessionController>>>>,

    /// Capture device shared by all sessions
    pub device: Arc<dyn CaptureDevice>,

    /// Transcription backend shared by all sessions
    pub backend: Arc<dyn TranscriptionBackend>,

    /// Transcript analysis client, if configured
    pub analyzer: Option<Arc<TextAnalyzer>>,

    pub defaults: SessionDefaults,
}

impl AppState {
    pub fn new(
        device: Arc<dyn CaptureDevice>,
        backend: Arc<dyn TranscriptionBackend>,
        analyzer: Option<Arc<TextAnalyzer>>,
        defaults: SessionDefaults,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            device,
            backend,
            analyzer,
            defaults,
        }
    }
}
