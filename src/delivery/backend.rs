use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use crate::audio::SegmentRef;
use crate::error::DeliveryError;

/// Transcription backend boundary: one audio segment in, one text string
/// out. Timeout policy belongs to the implementation; there is no retry at
/// this layer or above it.
#[async_trait::async_trait]
pub trait TranscriptionBackend: Send + Sync {
    async fn transcribe(&self, segment: &SegmentRef) -> Result<String, DeliveryError>;
}

#[derive(Debug, Deserialize)]
struct TranscribeResponse {
    transcription: String,
}

/// HTTP client for the Whisper backend.
///
/// Uploads each segment as a multipart file to `<base>/transcribe` and
/// reads back `{"transcription": "..."}`.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl TranscriptionBackend for HttpBackend {
    async fn transcribe(&self, segment: &SegmentRef) -> Result<String, DeliveryError> {
        let url = format!("{}/transcribe", self.base_url);

        debug!(
            "Uploading segment {} ({} bytes) to {}",
            segment.sequence,
            segment.data.len(),
            url
        );

        let file_part = Part::bytes(segment.data.clone())
            .file_name(segment.file_name())
            .mime_str("audio/wav")
            .map_err(|e| DeliveryError::Upload(e.to_string()))?;

        let form = Form::new().part("file", file_part);

        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Status { status, body });
        }

        let body: TranscribeResponse = response.json().await?;

        debug!(
            "Segment {} transcribed ({} chars)",
            segment.sequence,
            body.transcription.len()
        );

        Ok(body.transcription)
    }
}
