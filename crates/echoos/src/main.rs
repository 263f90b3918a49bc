// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! EchoOS - memory, retrieval-augmented chat, and agents behind one HTTP API.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod check;
mod serve;
mod wiring;

use clap::{Parser, Subcommand};

/// EchoOS assistant backend.
#[derive(Parser, Debug)]
#[command(name = "echoos", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway (the default).
    Serve,
    /// Re-embed and re-index every memory of one owner.
    Reindex {
        /// Owner reference whose memories are reindexed.
        #[arg(long)]
        owner: String,
    },
    /// Load and validate configuration, then print the effective values.
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match echoos_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            echoos_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Reindex { owner } => serve::run_reindex(config, &owner).await,
        Commands::CheckConfig => check::run_check(&config),
    };

    if let Err(e) = result {
        eprintln!("echoos: {e}");
        std::process::exit(1);
    }
}
