//! CLI command handling
//!
//! Loads configuration, applies flag overrides, and dispatches into the
//! suite runner.

use std::path::Path;

use colored::Colorize;

use crate::api::ApiClient;
use crate::browser;
use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::Result;
use crate::suite;

fn load_config(
    path: Option<&Path>,
    server_url: Option<String>,
    webdriver_url: Option<String>,
) -> Result<Config> {
    let mut config = Config::load(path)?;
    if let Some(url) = server_url {
        config.server.base_url = url;
    }
    if let Some(url) = webdriver_url {
        config.webdriver.url = url;
    }
    Ok(config)
}

/// Dispatch a CLI command
pub async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            scenario,
            verbose,
            server_url,
            webdriver_url,
            config,
        } => {
            let config = load_config(config.as_deref(), server_url, webdriver_url)?;
            let report = suite::run_suite(&config, scenario.as_deref(), verbose).await?;

            if !report.all_passed() {
                // Scenario failures were already reported in the summary
                std::process::exit(1);
            }
            Ok(())
        }

        Commands::List => {
            println!("Available scenarios:");
            for scenario in suite::catalogue() {
                println!(
                    "  {}  {}",
                    scenario.name.white().bold(),
                    scenario.description.dimmed()
                );
            }
            Ok(())
        }

        Commands::Check {
            server_url,
            webdriver_url,
            config,
        } => {
            let config = load_config(config.as_deref(), server_url, webdriver_url)?;
            let mut failed = false;

            let api = ApiClient::new(&config.server.base_url, &config.timeouts)?;
            match api.ping().await {
                Ok(()) => println!(
                    "  {} chat server reachable at {}",
                    "✓".green(),
                    config.server.base_url
                ),
                Err(e) => {
                    println!("  {} chat server: {}", "✗".red(), e);
                    failed = true;
                }
            }

            match browser::webdriver_ready(&config.webdriver.url, &config.timeouts).await {
                Ok(true) => println!(
                    "  {} WebDriver ready at {}",
                    "✓".green(),
                    config.webdriver.url
                ),
                Ok(false) => {
                    println!(
                        "  {} WebDriver at {} is not ready for new sessions",
                        "✗".red(),
                        config.webdriver.url
                    );
                    failed = true;
                }
                Err(e) => {
                    println!("  {} WebDriver: {}", "✗".red(), e);
                    failed = true;
                }
            }

            if failed {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
