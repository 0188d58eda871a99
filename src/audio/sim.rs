use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use tracing::debug;

use super::device::{AudioFormat, CaptureDevice, DeviceHandle};
use crate::error::DeviceError;

/// Microphone stand-in that synthesizes a sine tone.
///
/// Lets the pipeline run end to end on machines without audio hardware;
/// real platform drivers plug in behind the same `CaptureDevice` trait.
pub struct SimulatedMicrophone {
    /// Tone frequency in Hz
    frequency: f32,
    next_id: AtomicU64,
    /// Capture start instants for open handles
    running: Mutex<HashMap<u64, Instant>>,
}

impl SimulatedMicrophone {
    pub fn new() -> Self {
        Self {
            frequency: 440.0,
            next_id: AtomicU64::new(0),
            running: Mutex::new(HashMap::new()),
        }
    }

    fn encode_wav(format: AudioFormat, samples: &[i16]) -> Result<Vec<u8>, DeviceError> {
        let spec = hound::WavSpec {
            channels: format.channels,
            sample_rate: format.sample_rate,
            bits_per_sample: format.bits_per_sample,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| DeviceError::Driver(format!("WAV writer: {e}")))?;

        for &sample in samples {
            writer
                .write_sample(sample)
                .map_err(|e| DeviceError::Driver(format!("WAV sample: {e}")))?;
        }

        writer
            .finalize()
            .map_err(|e| DeviceError::Driver(format!("WAV finalize: {e}")))?;

        Ok(cursor.into_inner())
    }
}

impl Default for SimulatedMicrophone {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CaptureDevice for SimulatedMicrophone {
    async fn prepare(&self, format: AudioFormat) -> Result<DeviceHandle, DeviceError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        debug!("Simulated microphone prepared (handle {})", id);
        Ok(DeviceHandle::new(id, format))
    }

    async fn start(&self, handle: &mut DeviceHandle) -> Result<(), DeviceError> {
        let mut running = self.running.lock().unwrap();
        running.insert(handle.id, Instant::now());
        Ok(())
    }

    async fn stop(&self, handle: DeviceHandle) -> Result<Vec<u8>, DeviceError> {
        let started = {
            let mut running = self.running.lock().unwrap();
            running
                .remove(&handle.id)
                .ok_or_else(|| DeviceError::Driver("handle was never started".into()))?
        };

        let format = handle.format;
        let elapsed = started.elapsed();
        let frames = (elapsed.as_secs_f64() * format.sample_rate as f64) as usize;

        // Quiet sine tone, interleaved across channels
        let mut samples = Vec::with_capacity(frames * format.channels as usize);
        for n in 0..frames {
            let t = n as f32 / format.sample_rate as f32;
            let value =
                ((t * self.frequency * 2.0 * std::f32::consts::PI).sin() * 0.1 * i16::MAX as f32)
                    as i16;
            for _ in 0..format.channels {
                samples.push(value);
            }
        }

        debug!(
            "Simulated microphone stopped (handle {}, {:.1}s, {} samples)",
            handle.id,
            elapsed.as_secs_f64(),
            samples.len()
        );

        Self::encode_wav(format, &samples)
    }

    fn name(&self) -> &str {
        "simulated-microphone"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stop_yields_decodable_wav() {
        let mic = SimulatedMicrophone::new();
        let format = AudioFormat::default();

        let mut handle = mic.prepare(format).await.unwrap();
        mic.start(&mut handle).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        let bytes = mic.stop(handle).await.unwrap();

        let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.sample_rate, 16000);
        assert_eq!(spec.channels, 1);
        assert!(reader.len() > 0, "captured audio should not be empty");
    }

    #[tokio::test]
    async fn stopping_unstarted_handle_is_an_error() {
        let mic = SimulatedMicrophone::new();
        let handle = mic.prepare(AudioFormat::default()).await.unwrap();
        assert!(mic.stop(handle).await.is_err());
    }
}
