pub mod device;
pub mod recorder;
pub mod segment;
pub mod sim;

pub use device::{AudioFormat, CaptureDevice, DeviceHandle};
pub use recorder::SegmentRecorder;
pub use segment::SegmentRef;
pub use sim::SimulatedMicrophone;
