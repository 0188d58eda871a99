use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    interesting_part: Option<String>,
    error: Option<String>,
}

/// Client for the backend's text-analysis endpoint.
///
/// Sends a finished transcript to `<base>/analyze_text` and returns the
/// one-sentence summary of anything interesting in it (or the backend's
/// literal "Nothing interesting").
pub struct TextAnalyzer {
    client: reqwest::Client,
    base_url: String,
}

impl TextAnalyzer {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build analysis HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn analyze(&self, text: &str) -> Result<String> {
        let url = format!("{}/analyze_text", self.base_url);

        info!("Analyzing transcript ({} chars)", text.len());

        let response = self
            .client
            .post(&url)
            .json(&json!({ "text": text }))
            .send()
            .await
            .context("Analysis request failed")?
            .error_for_status()
            .context("Analysis backend returned an error status")?;

        let body: AnalyzeResponse = response
            .json()
            .await
            .context("Failed to parse analysis response")?;

        if let Some(error) = body.error {
            bail!("Analysis backend error: {}", error);
        }

        body.interesting_part
            .context("Analysis response had neither result nor error")
    }
}
