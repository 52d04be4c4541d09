//! Configuration file loading and resolution.
//!
//! Loads configuration from:
//! - Linux: `~/.config/orgcost/config.toml`
//! - macOS: `~/Library/Application Support/com.orgcost.orgcost/config.toml`
//! - Windows: `%APPDATA%/orgcost/orgcost/config/config.toml`
//!
//! ## Precedence
//!
//! Settings are resolved with the following precedence (highest first):
//! 1. CLI flags
//! 2. Environment variables
//! 3. Config file
//! 4. Built-in defaults
//!
//! ## Environment Variables
//!
//! - `ORGCOST_BASE_URL`: API base URL
//! - `ORGCOST_TIMEOUT`: Request timeout in seconds
//! - `ORGCOST_FORMAT`: Output format (human, json, md)
//! - `ORGCOST_NO_COLOR` or `NO_COLOR`: Disable colors
//! - `ORGCOST_PRETTY`: Pretty-print JSON output (1, true, yes)
//! - `ORGCOST_API_KEY`, then `OPENAI_API_KEY`: Default API key
//! - `ORGCOST_CONFIG`: Override config file path

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use super::AppPaths;
use crate::cli::args::{Cli, OutputFormat};
use crate::core::http::DEFAULT_BASE_URL;
use crate::core::pipeline::ClientSettings;
use crate::error::{OrgcostError, Result};

// =============================================================================
// Environment Variable Names
// =============================================================================

pub const ENV_BASE_URL: &str = "ORGCOST_BASE_URL";
pub const ENV_FORMAT: &str = "ORGCOST_FORMAT";
pub const ENV_TIMEOUT: &str = "ORGCOST_TIMEOUT";
pub const ENV_NO_COLOR: &str = "ORGCOST_NO_COLOR";
/// Standard environment variable to disable colors.
pub const ENV_NO_COLOR_STD: &str = "NO_COLOR";
pub const ENV_PRETTY: &str = "ORGCOST_PRETTY";
pub const ENV_API_KEY: &str = "ORGCOST_API_KEY";
/// Fallback key variable shared with other `OpenAI` tooling.
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_CONFIG: &str = "ORGCOST_CONFIG";

const MAX_TIMEOUT_SECONDS: u64 = 300;
const MAX_LOOKBACK_DAYS: u32 = 365;

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Final configuration after merging CLI, env vars, and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Credential used when a command is given no `--api-key`.
    pub api_key: Option<String>,
    /// Default `--days` for the costs command.
    pub lookback_days: u32,
    pub format: OutputFormat,
    pub no_color: bool,
    pub pretty: bool,
    /// Source of each setting for debugging.
    pub sources: ConfigSources,
}

/// Tracks the source of each configuration value.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub base_url: ConfigSource,
    pub timeout: ConfigSource,
    pub api_key: ConfigSource,
    pub lookback_days: ConfigSource,
    pub format: ConfigSource,
    pub no_color: ConfigSource,
    pub pretty: ConfigSource,
}

/// Where a configuration value came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    Cli,
    Env,
    ConfigFile,
    #[default]
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI flag"),
            Self::Env => write!(f, "environment variable"),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl ResolvedConfig {
    /// Resolve configuration from CLI args, the process environment and the
    /// config file (honoring `ORGCOST_CONFIG`).
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but is invalid, or if any
    /// resolved value is out of range.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let env = |key: &str| std::env::var(key).ok();
        let config = match env(ENV_CONFIG) {
            Some(path) => Config::load_from(Path::new(&path))?,
            None => Config::load()?,
        };
        Self::resolve_from(cli, &config, env)
    }

    /// Resolve against an explicit config and environment lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the config or any resolved value is invalid.
    pub fn resolve_from(
        cli: &Cli,
        config: &Config,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        config.validate()?;
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let mut sources = ConfigSources::default();

        let base_url = if let Some(url) = &cli.base_url {
            sources.base_url = ConfigSource::Cli;
            url.clone()
        } else if let Some(url) = env(ENV_BASE_URL) {
            sources.base_url = ConfigSource::Env;
            url
        } else if let Some(url) = &config.api.base_url {
            sources.base_url = ConfigSource::ConfigFile;
            url.clone()
        } else {
            DEFAULT_BASE_URL.to_string()
        };
        validate_base_url(&base_url)?;

        let timeout_seconds = if let Some(secs) = cli.timeout {
            sources.timeout = ConfigSource::Cli;
            secs
        } else if let Some(value) = env(ENV_TIMEOUT) {
            sources.timeout = ConfigSource::Env;
            parse_timeout(&value)?
        } else {
            sources.timeout = ConfigSource::ConfigFile;
            config.api.timeout_seconds
        };
        validate_timeout(timeout_seconds)?;

        let api_key = if let Some(key) = env(ENV_API_KEY).or_else(|| env(ENV_OPENAI_API_KEY)) {
            sources.api_key = ConfigSource::Env;
            Some(key.trim().to_string())
        } else if let Some(key) = config.api.api_key.as_deref().map(str::trim) {
            sources.api_key = ConfigSource::ConfigFile;
            Some(key.to_string()).filter(|k| !k.is_empty())
        } else {
            None
        };

        sources.lookback_days = ConfigSource::ConfigFile;
        let lookback_days = config.fetch.lookback_days;

        let format = if cli.json {
            sources.format = ConfigSource::Cli;
            OutputFormat::Json
        } else if let Some(format) = cli.format {
            sources.format = ConfigSource::Cli;
            format
        } else if let Some(value) = env(ENV_FORMAT) {
            sources.format = ConfigSource::Env;
            parse_format(&value)?
        } else if let Some(value) = &config.output.format {
            sources.format = ConfigSource::ConfigFile;
            parse_format(value)?
        } else {
            OutputFormat::Human
        };

        let no_color = if cli.no_color {
            sources.no_color = ConfigSource::Cli;
            true
        } else if env(ENV_NO_COLOR).is_some_and(|v| is_truthy(&v)) || env(ENV_NO_COLOR_STD).is_some()
        {
            sources.no_color = ConfigSource::Env;
            true
        } else if !config.output.color {
            sources.no_color = ConfigSource::ConfigFile;
            true
        } else {
            false
        };

        let pretty = if cli.pretty {
            sources.pretty = ConfigSource::Cli;
            true
        } else if env(ENV_PRETTY).is_some_and(|v| is_truthy(&v)) {
            sources.pretty = ConfigSource::Env;
            true
        } else if config.output.pretty {
            sources.pretty = ConfigSource::ConfigFile;
            true
        } else {
            false
        };

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_seconds),
            api_key,
            lookback_days,
            format,
            no_color,
            pretty,
            sources,
        })
    }

    /// Connection settings for the usage pipeline.
    #[must_use]
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            default_credential: self.api_key.clone(),
            timeout: self.timeout,
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_format(s: &str) -> Result<OutputFormat> {
    match s.trim().to_lowercase().as_str() {
        "human" => Ok(OutputFormat::Human),
        "json" => Ok(OutputFormat::Json),
        "md" | "markdown" => Ok(OutputFormat::Md),
        _ => Err(OrgcostError::Config(format!(
            "Invalid format '{s}'. Valid formats: human, json, md"
        ))),
    }
}

fn parse_timeout(s: &str) -> Result<u64> {
    s.trim().parse().map_err(|_| {
        OrgcostError::Config(format!(
            "Invalid timeout '{s}'. Expected a whole number of seconds"
        ))
    })
}

fn validate_base_url(url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(OrgcostError::Config(format!(
            "Invalid base URL \"{url}\". It must start with http:// or https://"
        )))
    }
}

fn validate_timeout(seconds: u64) -> Result<()> {
    if seconds == 0 || seconds > MAX_TIMEOUT_SECONDS {
        return Err(OrgcostError::Config(format!(
            "Timeout must be between 1 and {MAX_TIMEOUT_SECONDS} seconds"
        )));
    }
    Ok(())
}

// =============================================================================
// Config File
// =============================================================================

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub fetch: FetchConfig,
    pub output: OutputConfig,
}

/// `[api]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    /// Prefer the environment for secrets; this is the last fallback.
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

/// `[fetch]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Days before today covered when no dates are given.
    pub lookback_days: u32,
}

/// `[output]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (human, json, md).
    pub format: Option<String>,
    pub color: bool,
    pub pretty: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout_seconds: 30,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { lookback_days: 30 }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            pretty: false,
        }
    }
}

impl Config {
    /// Load configuration from the default config file path.
    ///
    /// Returns default config if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error only if the file exists but is invalid.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().config_file())
    }

    /// Load configuration from a specific path.
    ///
    /// Returns default config if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error only if the file exists but is invalid.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        tracing::debug!(?path, "Loading config file");
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| OrgcostError::Config(format!("Invalid config file: {e}")))
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`OrgcostError::Config`] describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if let Some(format) = &self.output.format {
            parse_format(format)?;
        }

        if let Some(url) = &self.api.base_url {
            validate_base_url(url)?;
        }

        validate_timeout(self.api.timeout_seconds)?;

        if self.fetch.lookback_days == 0 || self.fetch.lookback_days > MAX_LOOKBACK_DAYS {
            return Err(OrgcostError::Config(format!(
                "Lookback must be between 1 and {MAX_LOOKBACK_DAYS} days"
            )));
        }

        Ok(())
    }
}
