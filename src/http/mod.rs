//! HTTP API for external control (the app's start/stop surface)
//!
//! This module provides a REST API for controlling recording sessions:
//! - POST /sessions/start - Start a new recording session
//! - POST /sessions/stop/:id - Stop a session, returning its transcript
//! - GET /sessions/:id/status - Query session statistics
//! - GET /sessions/:id/transcript - Get the transcript so far
//! - POST /sessions/:id/analyze - Summarize the transcript
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::{AppState, SessionDefaults};
