//! Error types for orgcost.
//!
//! Uses `thiserror` for structured error types that map to exit codes.
//!
//! ## Error Taxonomy
//!
//! Errors are categorized into five main categories:
//! - **Authentication**: Missing or rejected credentials
//! - **Network**: Connection and timeout issues
//! - **Configuration**: Config file parsing, validation, or bad arguments
//! - **Provider**: Rate limits, API errors, malformed responses
//! - **Internal**: Unexpected errors, bugs, or unclassified issues
//!
//! Each error has a stable error code (e.g., `ORGCOST-A001`) for programmatic handling.
//!
//! Most fetch failures never leave the pipeline: the cost fetcher recovers
//! them by substituting synthetic data. The variants here are what the
//! fetcher reasons about internally and what the CLI reports for
//! configuration or credential problems.

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// High-level error categories for classification and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Missing or rejected credentials.
    Authentication,
    /// Timeouts and transport failures.
    Network,
    /// Config files, arguments, and date ranges.
    Configuration,
    /// Rate limits, API errors, and response parsing.
    Provider,
    /// Internal errors (bugs, unexpected state, unclassified).
    Internal,
}

impl ErrorCategory {
    /// Returns a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Authentication => "Authentication error",
            Self::Network => "Network error",
            Self::Configuration => "Configuration error",
            Self::Provider => "Provider error",
            Self::Internal => "Internal error",
        }
    }

    /// Returns a short code prefix for this category.
    #[must_use]
    pub const fn code_prefix(&self) -> &'static str {
        match self {
            Self::Authentication => "A",
            Self::Network => "N",
            Self::Configuration => "C",
            Self::Provider => "P",
            Self::Internal => "X",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

// =============================================================================
// Exit Codes
// =============================================================================

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// Unexpected failure
    GeneralError = 1,
    /// Credential missing or rejected
    AuthFailed = 2,
    /// Parse/format errors, invalid configuration or arguments
    ParseError = 3,
    /// Timeout
    Timeout = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

/// Main error type for orgcost operations.
#[derive(Error, Debug)]
pub enum OrgcostError {
    // ==========================================================================
    // Authentication errors (Category: Authentication)
    // ==========================================================================
    /// No explicit credential and no configured default.
    #[error("no API key provided and no default API key configured")]
    AuthNotConfigured,

    /// The API rejected the credential.
    #[error("API key rejected: {reason}")]
    AuthInvalid { reason: String },

    // ==========================================================================
    // Network errors (Category: Network)
    // ==========================================================================
    /// Request timed out after the configured client timeout.
    #[error("request timeout after {0} seconds")]
    Timeout(u64),

    /// Transport-level failure (connect, DNS, TLS, body read).
    #[error("network error: {0}")]
    Network(String),

    // ==========================================================================
    // Provider errors (Category: Provider)
    // ==========================================================================
    /// Rate limited and the retry budget is exhausted.
    #[error("rate limited: {message}")]
    RateLimited {
        retry_after: Option<Duration>,
        message: String,
    },

    /// The API returned a non-success status.
    #[error("API error ({status_code}): {message}")]
    ProviderApiError { status_code: u16, message: String },

    /// Failed to parse or interpret an API response.
    #[error("failed to parse response: {0}")]
    ParseResponse(String),

    // ==========================================================================
    // Configuration errors (Category: Configuration)
    // ==========================================================================
    /// Start or end date could not be parsed.
    #[error("invalid date range {start}..{end}: {reason}")]
    InvalidDateRange {
        start: String,
        end: String,
        reason: String,
    },

    /// Generic configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    // ==========================================================================
    // Internal errors (Category: Internal)
    // ==========================================================================
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for other errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OrgcostError {
    /// Map error to process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::AuthNotConfigured | Self::AuthInvalid { .. } => ExitCode::AuthFailed,

            Self::Config(_) | Self::InvalidDateRange { .. } | Self::ParseResponse(_) => {
                ExitCode::ParseError
            }

            Self::Timeout(_) => ExitCode::Timeout,

            Self::Network(_)
            | Self::RateLimited { .. }
            | Self::ProviderApiError { .. }
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => ExitCode::GeneralError,
        }
    }

    /// Returns the error category for classification and routing.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::AuthNotConfigured | Self::AuthInvalid { .. } => ErrorCategory::Authentication,

            Self::Timeout(_) | Self::Network(_) => ErrorCategory::Network,

            Self::Config(_) | Self::InvalidDateRange { .. } => ErrorCategory::Configuration,

            Self::RateLimited { .. } | Self::ProviderApiError { .. } | Self::ParseResponse(_) => {
                ErrorCategory::Provider
            }

            Self::Io(_) | Self::Json(_) | Self::Other(_) => ErrorCategory::Internal,
        }
    }

    /// Returns a stable error code for programmatic handling.
    ///
    /// Format: `ORGCOST-{category}{number}`.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AuthNotConfigured => "ORGCOST-A001",
            Self::AuthInvalid { .. } => "ORGCOST-A002",

            Self::Timeout(_) => "ORGCOST-N001",
            Self::Network(_) => "ORGCOST-N099",

            Self::InvalidDateRange { .. } => "ORGCOST-C001",
            Self::Config(_) => "ORGCOST-C004",

            Self::RateLimited { .. } => "ORGCOST-P001",
            Self::ProviderApiError { .. } => "ORGCOST-P003",
            Self::ParseResponse(_) => "ORGCOST-P020",

            Self::Io(_) => "ORGCOST-X001",
            Self::Json(_) => "ORGCOST-X002",
            Self::Other(_) => "ORGCOST-X099",
        }
    }

    /// Returns whether a cost page request that failed this way is worth retrying.
    ///
    /// Client errors (4xx other than 429) are final. Server errors, transport
    /// failures, rate limits, and unparseable bodies are treated as transient.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_)
            | Self::Network(_)
            | Self::RateLimited { .. }
            | Self::ParseResponse(_) => true,
            Self::ProviderApiError { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }

    /// Returns the retry-after duration if this error specifies one.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// A one-line next step for the user, when there is an obvious one.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        match self {
            Self::AuthNotConfigured => {
                Some("Pass --api-key, or set ORGCOST_API_KEY or OPENAI_API_KEY")
            }
            Self::AuthInvalid { .. } => {
                Some("Check that the key is an admin key for the organization")
            }
            Self::Timeout(_) => Some("Raise --timeout or ORGCOST_TIMEOUT"),
            Self::InvalidDateRange { .. } => Some("Dates use the YYYY-MM-DD format"),
            Self::Config(_) => Some("Check the config file (ORGCOST_CONFIG overrides its path)"),
            _ => None,
        }
    }
}

/// Result type alias for orgcost operations.
pub type Result<T> = std::result::Result<T, OrgcostError>;
