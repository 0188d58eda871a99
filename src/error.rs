use thiserror::Error;

/// Errors raised by the capture device boundary (prepare/start/stop/cut).
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Microphone permission was revoked after the session started
    #[error("microphone permission revoked")]
    PermissionRevoked,

    /// Device is already in use by another capture stream
    #[error("capture device is busy")]
    Busy,

    /// The replacement handle after a segment cut could not be started,
    /// and the one-tick retry also failed
    #[error("failed to restart capture after segment cut: {0}")]
    RestartFailed(String),

    /// Anything else the driver reports
    #[error("capture device failure: {0}")]
    Driver(String),
}

/// Errors raised while delivering one segment to the transcription backend.
///
/// These never escape the delivery worker: the segment is dropped, the
/// failure is logged and counted, and the drain loop moves on.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("transcription request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("transcription backend returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("could not build multipart upload: {0}")]
    Upload(String),
}

/// Errors surfaced synchronously from session start/stop.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Recording permission has not been granted; retrying start after the
    /// user grants it is fine
    #[error("microphone permission not granted")]
    PermissionDenied,

    #[error(transparent)]
    Device(#[from] DeviceError),
}
