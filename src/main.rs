//! chatsuite - browser-driven end-to-end suite for a team chat server
//!
//! Sets up fixtures over REST, drives the channel discovery UI through a
//! WebDriver browser, and reports per-scenario pass/fail.

use clap::Parser;
use chatsuite::{cli, commands::Commands, common};

#[derive(Parser)]
#[command(name = "chatsuite", about = "End-to-end suite for the chat server's channel discovery UI")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    common::logging::init_cli();

    let cli = Cli::parse();

    if let Err(e) = cli::dispatch(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
