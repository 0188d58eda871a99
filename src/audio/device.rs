use crate::error::DeviceError;

/// Capture format for a recording stream
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct AudioFormat {
    /// Sample rate in Hz (Whisper expects 16kHz)
    pub sample_rate: u32,
    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u16,
    /// Bits per sample (16-bit linear PCM)
    pub bits_per_sample: u16,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self {
            sample_rate: 16000, // 16kHz for Whisper
            channels: 1,        // Mono
            bits_per_sample: 16,
        }
    }
}

impl AudioFormat {
    /// Nominal bitrate of the raw stream in bits/second (~128 kbps -> 256 kbps
    /// raw PCM at the default format; the reference quality target)
    pub fn bitrate(&self) -> u32 {
        self.sample_rate * self.channels as u32 * self.bits_per_sample as u32
    }
}

/// One open capture stream bound to device resources.
///
/// Valid from `start` until `stop`; exclusively owned by the
/// `SegmentRecorder`, never shared or stopped concurrently.
#[derive(Debug)]
pub struct DeviceHandle {
    pub(crate) id: u64,
    pub(crate) format: AudioFormat,
}

impl DeviceHandle {
    /// Drivers mint a handle per prepared stream; the id is driver-scoped.
    pub fn new(id: u64, format: AudioFormat) -> Self {
        Self { id, format }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }
}

/// Audio capture device boundary.
///
/// The driver behind this trait guarantees that `start` immediately after
/// `stop` begins capturing with no missed samples; the recorder treats the
/// hand-off gap as the device's contract and only measures it.
#[async_trait::async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Allocate a capture stream for the given format.
    ///
    /// Fails with `DeviceError::PermissionRevoked` or `DeviceError::Busy`
    /// when the microphone cannot be acquired.
    async fn prepare(&self, format: AudioFormat) -> Result<DeviceHandle, DeviceError>;

    /// Begin capturing on a prepared handle
    async fn start(&self, handle: &mut DeviceHandle) -> Result<(), DeviceError>;

    /// Stop capturing and materialize the finished audio as encoded bytes
    /// (WAV container). Consumes the handle; its device resources are
    /// released before this returns.
    async fn stop(&self, handle: DeviceHandle) -> Result<Vec<u8>, DeviceError>;

    /// Device name for logging
    fn name(&self) -> &str;
}
