use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};

use super::device::{AudioFormat, CaptureDevice, DeviceHandle};
use super::segment::SegmentRef;
use crate::error::DeviceError;

/// Owns the one active recording handle and rotates it on chunk boundaries.
///
/// `cut_segment` stops the current handle, materializes the finished audio,
/// and immediately starts a replacement so the next chunk begins with no
/// intentional silence. The capture loop is the only caller; the handle is
/// never touched from anywhere else.
pub struct SegmentRecorder {
    device: Arc<dyn CaptureDevice>,
    format: AudioFormat,
    handle: Option<DeviceHandle>,
    next_sequence: u64,
    /// Set when the replacement start failed on the previous cut; the next
    /// tick retries the start once instead of ending the session.
    restart_pending: bool,
}

impl SegmentRecorder {
    /// Allocate and start device capture.
    pub async fn prepare_and_start(
        device: Arc<dyn CaptureDevice>,
        format: AudioFormat,
    ) -> Result<Self, DeviceError> {
        let mut handle = device.prepare(format).await?;
        device.start(&mut handle).await?;

        info!(
            "Capture started on {} ({}Hz, {}ch, {}-bit)",
            device.name(),
            format.sample_rate,
            format.channels,
            format.bits_per_sample
        );

        Ok(Self {
            device,
            format,
            handle: Some(handle),
            next_sequence: 0,
            restart_pending: false,
        })
    }

    /// Stop the current handle, materialize the finished chunk, and start a
    /// replacement handle before returning.
    ///
    /// Returns `Ok(None)` on a tick that had no open handle (the previous
    /// replacement start failed and this tick's retry just reopened it).
    /// Returns `Err` only when the retry itself fails, at which point the
    /// controller may choose to end the session.
    pub async fn cut_segment(&mut self) -> Result<Option<SegmentRef>, DeviceError> {
        let handle = match self.handle.take() {
            Some(h) => h,
            None => {
                // Retry the start that failed on the previous boundary
                return match self.open_handle().await {
                    Ok(h) => {
                        info!("Capture restart retry succeeded");
                        self.handle = Some(h);
                        self.restart_pending = false;
                        Ok(None)
                    }
                    Err(e) => Err(DeviceError::RestartFailed(e.to_string())),
                };
            }
        };

        let boundary = Instant::now();
        let data = self.device.stop(handle).await?;

        // Gapless hand-off: begin the next chunk right away. The driver is
        // trusted to capture essentially immediately; the measured hand-off
        // time travels with the segment so the bound stays observable.
        match self.open_handle().await {
            Ok(h) => self.handle = Some(h),
            Err(e) => {
                warn!("Failed to restart capture after cut, will retry next tick: {e}");
                self.restart_pending = true;
            }
        }

        Ok(Some(self.materialize(data, boundary.elapsed())))
    }

    /// Final stop without restart; flushes the trailing partial chunk.
    pub async fn finish(mut self) -> Result<Option<SegmentRef>, DeviceError> {
        let handle = match self.handle.take() {
            Some(h) => h,
            None => return Ok(None),
        };

        let data = self.device.stop(handle).await?;
        let segment = self.materialize(data, std::time::Duration::ZERO);

        info!("Capture finished ({} segments)", segment.sequence + 1);

        Ok(Some(segment))
    }

    /// Whether a replacement start is still owed from a failed cut.
    pub fn restart_pending(&self) -> bool {
        self.restart_pending
    }

    async fn open_handle(&self) -> Result<DeviceHandle, DeviceError> {
        let mut handle = self.device.prepare(self.format).await?;
        self.device.start(&mut handle).await?;
        Ok(handle)
    }

    fn materialize(&mut self, data: Vec<u8>, handoff: std::time::Duration) -> SegmentRef {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        SegmentRef {
            sequence,
            data,
            format: self.format,
            captured_at: Utc::now(),
            handoff,
        }
    }
}
