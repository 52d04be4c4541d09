//! Application paths.

use std::path::PathBuf;

use directories::{BaseDirs, ProjectDirs};

/// Application paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Configuration directory.
    pub config: PathBuf,
}

impl AppPaths {
    /// Platform paths for orgcost (`~/.config/orgcost` on Linux).
    #[must_use]
    pub fn new() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("com", "orgcost", "orgcost") {
            Self {
                config: proj_dirs.config_dir().to_path_buf(),
            }
        } else {
            let home = BaseDirs::new()
                .map_or_else(|| PathBuf::from("."), |d| d.home_dir().to_path_buf());
            Self {
                config: home.join(".config/orgcost"),
            }
        }
    }

    /// Path to the TOML config file.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.toml")
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
