//! chatsuite - browser-driven end-to-end suite for a team chat server
//!
//! Drives a real browser over the WebDriver protocol against a running
//! chat server, setting up fixtures through the server's REST API and
//! asserting on the channel discovery UI.

pub mod api;
pub mod browser;
pub mod cli;
pub mod commands;
pub mod common;
pub mod suite;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use suite::{run_suite, SuiteReport};
