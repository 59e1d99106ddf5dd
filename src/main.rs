//! Main entry point for fieldlore.

use clap::Parser;
use fieldlore::cli::Cli;
use fieldlore::utils::error_exit;

#[tokio::main]
async fn main() {
    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = cli.execute().await {
        error_exit(&e.to_string(), 1);
    }
}
