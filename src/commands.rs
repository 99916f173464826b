//! CLI command definitions
//!
//! Defines the clap commands for the suite runner.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the end-to-end suite against a live server and browser
    Run {
        /// Run only the named scenario (see 'chatsuite list')
        #[arg(long)]
        scenario: Option<String>,

        /// Verbose output (extra per-step detail)
        #[arg(long, short)]
        verbose: bool,

        /// Chat server base URL (overrides config)
        #[arg(long)]
        server_url: Option<String>,

        /// WebDriver endpoint URL (overrides config)
        #[arg(long)]
        webdriver_url: Option<String>,

        /// Path to a config file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List available scenarios
    List,

    /// Check that the chat server and the WebDriver endpoint are reachable
    Check {
        /// Chat server base URL (overrides config)
        #[arg(long)]
        server_url: Option<String>,

        /// WebDriver endpoint URL (overrides config)
        #[arg(long)]
        webdriver_url: Option<String>,

        /// Path to a config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}
