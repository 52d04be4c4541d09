//! Diagnostic logging to stderr or a file.
//!
//! Logs never go to stdout, which is reserved for command output.

use std::fs::OpenOptions;
use std::path::PathBuf;

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

pub const LOG_LEVEL_ENV: &str = "ORGCOST_LOG";
pub const LOG_FORMAT_ENV: &str = "ORGCOST_LOG_FORMAT";
pub const LOG_FILE_ENV: &str = "ORGCOST_LOG_FILE";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, no timestamps.
    #[default]
    Human,
    /// One JSON object per event.
    Json,
    /// Single line with target.
    Compact,
}

impl LogFormat {
    /// Parse from string (case-insensitive).
    #[must_use]
    pub fn from_arg(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "human" | "pretty" => Some(Self::Human),
            "json" | "jsonl" => Some(Self::Json),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    #[default]
    Error,
}

impl LogLevel {
    /// Parse from CLI argument or env value.
    #[must_use]
    pub fn from_arg(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "verbose" | "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" | "critical" => Some(Self::Error),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_filter(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    #[must_use]
    pub const fn as_tracing_level(self) -> Level {
        match self {
            Self::Trace => Level::TRACE,
            Self::Debug => Level::DEBUG,
            Self::Info => Level::INFO,
            Self::Warn => Level::WARN,
            Self::Error => Level::ERROR,
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Resolved logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LogLevel,
    pub format: LogFormat,
    pub file: Option<PathBuf>,
}

impl LogSettings {
    /// Combine CLI flags with the `ORGCOST_LOG*` environment.
    ///
    /// CLI values win over env. `--verbose` only raises the default level,
    /// never an explicit one.
    #[must_use]
    pub fn resolve(cli_level: Option<&str>, json_output: bool, verbose: bool) -> Self {
        let explicit = cli_level
            .and_then(LogLevel::from_arg)
            .or_else(|| non_empty_env(LOG_LEVEL_ENV).and_then(|v| LogLevel::from_arg(&v)));
        let level = match explicit {
            Some(level) => level,
            None if verbose => LogLevel::Debug,
            None => LogLevel::default(),
        };

        let format = if json_output {
            LogFormat::Json
        } else {
            non_empty_env(LOG_FORMAT_ENV)
                .and_then(|v| LogFormat::from_arg(&v))
                .unwrap_or_default()
        };

        Self {
            level,
            format,
            file: non_empty_env(LOG_FILE_ENV).map(PathBuf::from),
        }
    }

    /// Default filter directive when `RUST_LOG` is unset.
    #[must_use]
    pub fn filter_directive(&self) -> String {
        format!("orgcost={}", self.level.as_filter())
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(settings: &LogSettings) {
    let file = settings.file.as_ref().and_then(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });
    let writer = match file {
        Some(file) => BoxMakeWriter::new(file),
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.filter_directive()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer);

    match settings.format {
        LogFormat::Json => builder
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .try_init()
            .ok(),
        LogFormat::Compact => builder.compact().with_target(true).try_init().ok(),
        LogFormat::Human => builder.with_target(false).without_time().try_init().ok(),
    };
}
