//! Command-line argument structures for Studio

use crate::tools::ToolKind;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Args)]
pub struct SummarizeArgs {
    /// Text to summarize
    #[arg(value_name = "TEXT", required_unless_present = "file")]
    pub text: Option<String>,

    /// Read the text from a file instead
    #[arg(short = 'F', long, conflicts_with = "text")]
    pub file: Option<PathBuf>,
}

#[derive(Args)]
pub struct IdeasArgs {
    /// Topic to generate ideas for
    #[arg(value_name = "TOPIC")]
    pub topic: String,
}

#[derive(Args)]
pub struct RefineArgs {
    /// Text to refine
    #[arg(value_name = "TEXT", required_unless_present = "file")]
    pub text: Option<String>,

    /// Read the text from a file instead
    #[arg(short = 'F', long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// How to refine it (e.g. "more formal", "concise")
    #[arg(short = 'I', long)]
    pub instruction: String,
}

#[derive(Args)]
pub struct ChatArgs {
    /// Message to send
    #[arg(value_name = "MESSAGE")]
    pub message: String,

    /// Continue an existing session
    #[arg(short = 'S', long)]
    pub session: Option<String>,
}

#[derive(Args)]
pub struct HistoryArgs {
    /// Tool whose history to manage
    #[arg(value_enum)]
    pub tool: ToolKind,

    #[command(subcommand)]
    pub action: HistoryAction,
}

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List records, most recent first
    List {
        /// Show timestamps
        #[arg(short = 'T', long)]
        timestamps: bool,
    },
    /// Show one record in full
    Show {
        /// Record id
        id: String,
    },
    /// Delete one record
    Remove {
        /// Record id
        id: String,
    },
    /// Delete every record
    Clear {
        /// Confirm deletion without prompting
        #[arg(short = 'F', long)]
        force: bool,
    },
    /// Export records as JSON
    Export {
        /// Output directory (configured export directory if not specified)
        #[arg(short = 'O', long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct RecentArgs {
    /// Number of entries to show
    #[arg(short = 'L', long, default_value = "10")]
    pub limit: usize,
}

#[derive(Args)]
pub struct LoginArgs {
    /// Email address of the account
    #[arg(long)]
    pub email: String,

    /// Display name
    #[arg(long)]
    pub name: Option<String>,

    /// Profile photo URL
    #[arg(long)]
    pub photo: Option<String>,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Show current configuration
    #[arg(long)]
    pub show: bool,

    /// Initialize configuration file with defaults
    #[arg(long)]
    pub init: bool,

    /// Validate configuration file
    #[arg(long)]
    pub validate: bool,
}
