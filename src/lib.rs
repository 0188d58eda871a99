pub mod analysis;
pub mod audio;
pub mod config;
pub mod delivery;
pub mod error;
pub mod http;
pub mod session;
pub mod transcript;

pub use analysis::TextAnalyzer;
pub use audio::{
    AudioFormat, CaptureDevice, DeviceHandle, SegmentRecorder, SegmentRef, SimulatedMicrophone,
};
pub use config::Config;
pub use delivery::{DeliveryQueue, HttpBackend, TranscriptionBackend};
pub use error::{DeliveryError, DeviceError, SessionError};
pub use http::{create_router, AppState, SessionDefaults};
pub use session::{SessionConfig, SessionController, SessionStats};
pub use transcript::TranscriptAssembler;
