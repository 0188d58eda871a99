//! Recording session management
//!
//! This module provides the `SessionController` abstraction that manages:
//! - The chunk-timer capture loop and its gapless segment hand-off
//! - Delivery of finished segments to the transcription backend
//! - Transcript accumulation and the update feed
//! - Session statistics and state transitions

mod config;
mod controller;
mod stats;

pub use config::SessionConfig;
pub use controller::SessionController;
pub use stats::SessionStats;
