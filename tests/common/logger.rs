//! Per-test logging with phases and durations.
#![allow(dead_code)]
//!
//! Output goes to stderr so it interleaves with cargo's captured test output.
//!
//! - `TEST_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//! - `TEST_LOG_JSON`: "1" or "true" for one JSON object per line

use std::fmt::Display;
use std::sync::Mutex;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;

use super::log_capture::TestLogCapture;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Serialize)]
struct LogEntry<'a> {
    timestamp: String,
    level: LogLevel,
    test: &'a str,
    phase: String,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_ms: Option<u64>,
}

fn min_level() -> LogLevel {
    std::env::var("TEST_LOG_LEVEL")
        .ok()
        .and_then(|v| LogLevel::parse(&v))
        .unwrap_or(LogLevel::Info)
}

fn json_mode() -> bool {
    std::env::var("TEST_LOG_JSON").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Logger scoped to one test.
pub struct TestLogger {
    test_name: String,
    start_time: Instant,
    phase: Mutex<String>,
}

impl TestLogger {
    #[must_use]
    pub fn new(test_name: &str) -> Self {
        let logger = Self {
            test_name: test_name.to_string(),
            start_time: Instant::now(),
            phase: Mutex::new("init".to_string()),
        };
        logger.log(LogLevel::Info, "Test starting", None);
        logger
    }

    /// Logger plus a tracing capture installed for the current thread.
    pub fn with_capture(test_name: &str) -> (Self, TestLogCapture) {
        let capture = TestLogCapture::start();
        (Self::new(test_name), capture)
    }

    pub fn phase(&self, phase: &str) {
        if let Ok(mut current) = self.phase.lock() {
            *current = phase.to_string();
        }
        self.log(LogLevel::Debug, &format!("Phase: {phase}"), None);
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message, None);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message, None);
    }

    pub fn http_request(&self, method: &str, url: &str) {
        self.debug(&format!("HTTP {method} {url}"));
    }

    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.start_time.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    pub fn finish_ok(&self) {
        let duration = self.elapsed_ms();
        self.log(
            LogLevel::Info,
            &format!("Test passed (duration: {duration}ms)"),
            Some(duration),
        );
    }

    fn log(&self, level: LogLevel, message: &str, duration_ms: Option<u64>) {
        if level < min_level() {
            return;
        }
        let phase = self
            .phase
            .lock()
            .map(|p| p.clone())
            .unwrap_or_else(|_| "unknown".to_string());

        if json_mode() {
            let entry = LogEntry {
                timestamp: Utc::now().to_rfc3339(),
                level,
                test: &self.test_name,
                phase,
                message,
                duration_ms,
            };
            if let Ok(line) = serde_json::to_string(&entry) {
                eprintln!("{line}");
            }
        } else {
            eprintln!(
                "[{}] {level:<5} {}::{phase} {message}",
                Utc::now().format("%H:%M:%S%.3f"),
                self.test_name
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parsing_and_order() {
        assert_eq!(LogLevel::parse("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("nope"), None);
        assert!(LogLevel::Debug < LogLevel::Error);
    }
}
