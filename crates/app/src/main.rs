//! Catalog Admin - Main Entry Point
//!
//! Loads the configuration, runs one command against the product service
//! and prints its output.

use std::process::ExitCode;

use catalog_admin::{App, AppError, Cli};
use catalog_infrastructure::{ClientConfig, init_tracing};
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    tracing::debug!("Starting catalog-admin v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    match run(cli).await {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("error: {error}");
            for line in error.details() {
                eprintln!("  {line}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<Vec<String>, AppError> {
    let app = App::new(ClientConfig::load()?)?;
    app.run(cli.command).await
}
