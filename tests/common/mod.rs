//! Shared helpers for integration tests.
//!
//! - `fixtures`: cost page fixtures and mock server setup
//! - `logger`: per-test phase logging
//! - `log_capture`: tracing capture for log assertions

pub mod fixtures;
pub mod log_capture;
pub mod logger;
