//! Command-line interface module for Studio
//!
//! This module is organized into submodules:
//! - `args`: Command-line argument structures
//! - `handlers`: Command handler implementations

mod args;
mod handlers;

pub use args::*;
use handlers::*;

use crate::config::Config;
use crate::error::Result;
use crate::studio::Studio;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Studio - AI content tools with local history
#[derive(Parser)]
#[command(name = "studio")]
#[command(about = "AI content tools with bounded local history and offline fallbacks")]
#[command(version, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize a text
    Summarize(SummarizeArgs),
    /// Generate content ideas for a topic
    Ideas(IdeasArgs),
    /// Refine a text following an instruction
    Refine(RefineArgs),
    /// Chat with the assistant
    Chat(ChatArgs),
    /// Manage a tool's history
    History(HistoryArgs),
    /// Show recent activity across all tools
    Recent(RecentArgs),
    /// Sign in
    Login(LoginArgs),
    /// Sign out
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Show content service and history status
    Status,
    /// Show configuration
    Config(ConfigArgs),
}

/// Main CLI application
pub struct CliApp {
    pub config: Config,
    pub config_path: Option<PathBuf>,
    pub studio: Studio,
    pub verbose: bool,
    pub quiet: bool,
}

impl CliApp {
    /// Create a new CLI application
    pub fn new(cli: &Cli) -> Result<Self> {
        // Load configuration
        let config = if let Some(config_path) = &cli.config {
            Config::load_from_path(config_path)?
        } else {
            Config::load()?
        };

        let studio = Studio::new(config.clone())?;

        Ok(Self {
            config,
            config_path: cli.config.clone(),
            studio,
            verbose: cli.verbose,
            quiet: cli.quiet,
        })
    }

    /// Run the CLI application
    pub async fn run(&mut self, command: &Commands) -> Result<()> {
        self.verbose_println(&format!(
            "Using {:?} storage at {}",
            self.config.storage.backend,
            self.config.storage.path.display()
        ));

        match command {
            Commands::Summarize(args) => handle_summarize(self, args).await,
            Commands::Ideas(args) => handle_ideas(self, args).await,
            Commands::Refine(args) => handle_refine(self, args).await,
            Commands::Chat(args) => handle_chat(self, args).await,
            Commands::History(args) => handle_history(self, args),
            Commands::Recent(args) => handle_recent(self, args),
            Commands::Login(args) => handle_login(self, args),
            Commands::Logout => handle_logout(self),
            Commands::Whoami => handle_whoami(self),
            Commands::Status => handle_status(self).await,
            Commands::Config(args) => handle_config(self, args),
        }
    }

    pub fn verbose_println(&self, message: &str) {
        if self.verbose && !self.quiet {
            eprintln!("[verbose] {}", message);
        }
    }
}

/// Main entry point for the CLI
pub async fn run(cli: Cli) -> Result<()> {
    let mut app = CliApp::new(&cli)?;
    app.run(&cli.command).await
}
