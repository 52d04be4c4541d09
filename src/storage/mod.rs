//! Configuration storage.

pub mod config;
pub mod paths;

pub use config::{
    ApiConfig, Config, ConfigSource, ConfigSources, ENV_API_KEY, ENV_BASE_URL, ENV_CONFIG,
    ENV_FORMAT, ENV_NO_COLOR, ENV_NO_COLOR_STD, ENV_OPENAI_API_KEY, ENV_PRETTY, ENV_TIMEOUT,
    FetchConfig, OutputConfig, ResolvedConfig,
};
pub use paths::AppPaths;
