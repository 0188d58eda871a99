use anyhow::Result;
use serde::Deserialize;

use crate::audio::AudioFormat;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub http: HttpConfig,
    pub audio: AudioConfig,
    pub session: SessionSettings,
    pub backend: BackendConfig,
    /// Optional transcript-analysis endpoint; omit to disable the feature
    pub analysis: Option<AnalysisConfig>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

#[derive(Debug, Deserialize)]
pub struct SessionSettings {
    /// Chunk duration in milliseconds (default 6000)
    pub chunk_duration_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the transcription backend
    pub url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    pub url: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Load from file if present, otherwise fall back to defaults
    pub fn load_or_default(path: &str) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("No config loaded from {} ({}), using defaults", path, e);
                Self::default()
            }
        }
    }

    pub fn audio_format(&self) -> AudioFormat {
        AudioFormat {
            sample_rate: self.audio.sample_rate,
            channels: self.audio.channels,
            bits_per_sample: self.audio.bits_per_sample,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: "live-scribe".to_string(),
            },
            http: HttpConfig {
                bind: "127.0.0.1".to_string(),
                port: 8787,
            },
            audio: AudioConfig {
                sample_rate: 16000,
                channels: 1,
                bits_per_sample: 16,
            },
            session: SessionSettings {
                chunk_duration_ms: 6000,
            },
            backend: BackendConfig {
                url: "http://localhost:8000".to_string(),
                timeout_secs: 30,
            },
            analysis: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_pipeline() {
        let cfg = Config::default();
        assert_eq!(cfg.session.chunk_duration_ms, 6000);

        let format = cfg.audio_format();
        assert_eq!(format.sample_rate, 16000);
        assert_eq!(format.channels, 1);
        assert_eq!(format.bits_per_sample, 16);
    }
}
