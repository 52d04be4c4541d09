//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};

/// Organization cost reporting for the `OpenAI` API.
#[derive(Parser, Debug)]
#[command(name = "orgcost")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    // === Global flags ===
    /// Output format [default: human]
    #[arg(long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Shorthand for --format json
    #[arg(long, global = true)]
    pub json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log level
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Emit JSONL logs to stderr
    #[arg(long, global = true)]
    pub json_output: bool,

    /// Verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// API base URL
    #[arg(long, value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECONDS", global = true)]
    pub timeout: Option<u64>,
}

impl Cli {
    /// Resolve the effective output format.
    #[must_use]
    pub const fn effective_format(&self) -> OutputFormat {
        match (self.json, self.format) {
            (true, _) => OutputFormat::Json,
            (false, Some(format)) => format,
            (false, None) => OutputFormat::Human,
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch and summarize organization costs (default command)
    Costs(CostsArgs),

    /// Check that an API key is accepted
    Validate(ValidateArgs),

    /// Show the pricing table used for token estimates
    Pricing,
}

/// Arguments for the `costs` command.
#[derive(Parser, Debug, Default)]
pub struct CostsArgs {
    /// API key (falls back to ORGCOST_API_KEY, OPENAI_API_KEY, then config)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// First day to include (YYYY-MM-DD, UTC)
    #[arg(long, value_name = "DATE", conflicts_with = "days")]
    pub start: Option<String>,

    /// Last day to include (YYYY-MM-DD, UTC)
    #[arg(long, value_name = "DATE", conflicts_with = "days")]
    pub end: Option<String>,

    /// Number of days before today to include
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..=365))]
    pub days: Option<u32>,

    /// Only include these project ids (repeatable)
    #[arg(long = "project", value_name = "ID")]
    pub projects: Vec<String>,

    /// Only include these models (repeatable)
    #[arg(long = "model", value_name = "MODEL")]
    pub models: Vec<String>,

    /// Skip the key check before fetching
    #[arg(long)]
    pub skip_validate: bool,
}

/// Arguments for the `validate` command.
#[derive(Parser, Debug, Default)]
pub struct ValidateArgs {
    /// API key (falls back to ORGCOST_API_KEY, OPENAI_API_KEY, then config)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored terminal output
    #[default]
    Human,
    /// JSON output
    Json,
    /// Markdown output
    Md,
}
