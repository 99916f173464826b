//! Configuration file handling

use serde::Deserialize;
use std::path::Path;

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Chat server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// WebDriver endpoint settings
    #[serde(default)]
    pub webdriver: WebDriverConfig,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,
}

/// Chat server settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the chat server under test
    #[serde(default = "default_server_url")]
    pub base_url: String,

    /// Admin account used for fixture creation and config updates
    #[serde(default = "default_admin_username")]
    pub admin_username: String,

    #[serde(default = "default_admin_password")]
    pub admin_password: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_server_url(),
            admin_username: default_admin_username(),
            admin_password: default_admin_password(),
        }
    }
}

fn default_server_url() -> String {
    "http://localhost:8065".to_string()
}
fn default_admin_username() -> String {
    "admin".to_string()
}
fn default_admin_password() -> String {
    "admin".to_string()
}

/// WebDriver endpoint settings
#[derive(Debug, Clone, Deserialize)]
pub struct WebDriverConfig {
    /// URL of the WebDriver endpoint (e.g. a chromedriver instance)
    #[serde(default = "default_webdriver_url")]
    pub url: String,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            url: default_webdriver_url(),
        }
    }
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

/// Timeout settings
///
/// Every wait in the suite uses these fixed budgets; there is no retry
/// logic beyond the poll loop, and exceeding a budget fails the scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct Timeouts {
    /// Budget for an element to reach the expected state
    #[serde(default = "default_element_wait")]
    pub element_wait_secs: u64,

    /// Timeout for a single HTTP request (REST or WebDriver)
    #[serde(default = "default_request")]
    pub request_secs: u64,

    /// Interval between element-wait polls
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Pause after typing into a search box, to let results settle
    #[serde(default = "default_settle")]
    pub settle_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            element_wait_secs: default_element_wait(),
            request_secs: default_request(),
            poll_interval_ms: default_poll_interval(),
            settle_ms: default_settle(),
        }
    }
}

fn default_element_wait() -> u64 {
    10
}
fn default_request() -> u64 {
    30
}
fn default_poll_interval() -> u64 {
    250
}
fn default_settle() -> u64 {
    500
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist and parse; without one, the default
    /// config file is used if present, and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
                path: path.display().to_string(),
                error: e.to_string(),
            })?;
            return toml::from_str(&content).map_err(|e| super::Error::ConfigParse(e.to_string()));
        }

        if let Some(path) = config_path() {
            if path.exists() {
                let content =
                    std::fs::read_to_string(&path).map_err(|e| super::Error::FileRead {
                        path: path.display().to_string(),
                        error: e.to_string(),
                    })?;
                return toml::from_str(&content)
                    .map_err(|e| super::Error::ConfigParse(e.to_string()));
            }
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.base_url, "http://localhost:8065");
        assert_eq!(config.webdriver.url, "http://localhost:9515");
        assert_eq!(config.timeouts.element_wait_secs, 10);
        assert_eq!(config.timeouts.settle_ms, 500);
    }

    #[test]
    fn test_partial_file_keeps_section_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            base_url = "http://chat.example.test:8065"

            [timeouts]
            element_wait_secs = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.server.base_url, "http://chat.example.test:8065");
        assert_eq!(config.server.admin_username, "admin");
        assert_eq!(config.timeouts.element_wait_secs, 3);
        assert_eq!(config.timeouts.poll_interval_ms, 250);
        assert_eq!(config.webdriver.url, "http://localhost:9515");
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[webdriver]\nurl = \"http://localhost:4444\"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.webdriver.url, "http://localhost:4444");
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let result = Config::load(Some(Path::new("/nonexistent/chatsuite.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nbase_url = oops").unwrap();

        let result = Config::load(Some(file.path()));
        assert!(matches!(
            result,
            Err(crate::common::Error::ConfigParse(_))
        ));
    }
}
