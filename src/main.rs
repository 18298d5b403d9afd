//! Studio - AI content tools with bounded local history
//!
//! This is the main entry point for the Studio command-line application.
//! It initializes logging and the async runtime and reports errors.

use clap::Parser;
use studio::cli::{self, Cli};
use studio::config::Config;
use std::process;
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins, then --verbose, then the configured level
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level(&cli)))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(cli::run(cli)) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn default_level(cli: &Cli) -> String {
    if cli.verbose {
        return "debug".to_string();
    }
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    config
        .map(|c| c.logging.level)
        .unwrap_or_else(|_| "warn".to_string())
}
