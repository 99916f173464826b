//! Configuration file locations

use directories::ProjectDirs;
use std::path::PathBuf;

/// Path to the default config file (`<config dir>/chatsuite/config.toml`)
pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "chatsuite").map(|dirs| dirs.config_dir().join("config.toml"))
}
