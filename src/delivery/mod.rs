//! Ordered segment delivery
//!
//! Finished segments go into an unbounded FIFO drained by a single worker
//! that uploads one segment at a time. Serialization bounds backend load to
//! one in-flight request and makes transcript order equal segment order
//! without any reordering buffer.

mod backend;
mod queue;

pub use backend::{HttpBackend, TranscriptionBackend};
pub use queue::DeliveryQueue;
