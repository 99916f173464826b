//! Error types for the suite runner
//!
//! The taxonomy separates the three ways a run goes wrong: fixture setup
//! failures (abort the whole run), assertion failures (expected vs. actual
//! DOM state), and element-wait timeouts (reported distinctly so a slow
//! page is not mistaken for a wrong one).

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the suite runner
#[derive(Error, Debug)]
pub enum Error {
    // === Server/Fixture Errors ===
    #[error("Chat server not reachable at {url}: {source}")]
    ServerUnreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Fixture setup failed: {0}")]
    Setup(String),

    #[error("Server returned {status} for {endpoint}: {message}")]
    ServerRequest {
        endpoint: String,
        status: u16,
        message: String,
    },

    // === WebDriver Errors ===
    #[error("WebDriver endpoint not reachable at {url}: {source}")]
    WebDriverUnreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("WebDriver request '{command}' failed: {message}")]
    WebDriver { command: String, message: String },

    #[error("No such element: {0}")]
    NoSuchElement(String),

    // === Assertion/Timeout Errors ===
    #[error("Assertion failed: {0}")]
    Assertion(String),

    #[error("Timed out after {secs}s waiting for '{selector}' to {condition}")]
    ElementTimeout {
        selector: String,
        condition: String,
        secs: u64,
    },

    // === Scenario Errors ===
    #[error("Unknown scenario '{0}'. Use 'chatsuite list' to see available scenarios")]
    UnknownScenario(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Transport Errors ===
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // === Internal Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an assertion error with expected/actual context
    pub fn assertion(
        context: &str,
        expected: impl std::fmt::Display,
        actual: impl std::fmt::Display,
    ) -> Self {
        Self::Assertion(format!(
            "{}: expected {}, got {}",
            context, expected, actual
        ))
    }

    /// Create a server request error
    pub fn server_request(endpoint: &str, status: u16, message: &str) -> Self {
        Self::ServerRequest {
            endpoint: endpoint.to_string(),
            status,
            message: message.to_string(),
        }
    }

    /// True for the failures that mean "the element never got there in time"
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::ElementTimeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assertion_formatting() {
        let err = Error::assertion("dropdown label", "'Show: Public Channels'", "'Show: All'");
        assert_eq!(
            err.to_string(),
            "Assertion failed: dropdown label: expected 'Show: Public Channels', got 'Show: All'"
        );
    }

    #[test]
    fn test_timeout_is_distinct_from_assertion() {
        let timeout = Error::ElementTimeout {
            selector: "#moreChannelsModal".to_string(),
            condition: "appear".to_string(),
            secs: 10,
        };
        assert!(timeout.is_timeout());
        assert!(!Error::Assertion("x".to_string()).is_timeout());
        assert_eq!(
            timeout.to_string(),
            "Timed out after 10s waiting for '#moreChannelsModal' to appear"
        );
    }
}
