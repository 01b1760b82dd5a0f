//! solen - Solana token and NFT toolkit
//!
//! Command line entry point

#![allow(missing_docs)]

use clap::Parser;
use solen::cli::{self, Cli};
use solen::utils::logging::init_logging;
use std::process::ExitCode;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.log_format) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Alternate form prints the whole context chain
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
