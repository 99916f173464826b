//! Fixture REST client for the chat server
//!
//! Test preconditions (users, teams, channels, server config) are set up
//! through the server's REST API rather than the UI.

mod client;
pub mod types;

pub use client::ApiClient;
