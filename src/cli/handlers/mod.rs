//! Command handler implementations for Studio CLI
//!
//! This module organizes command handlers into logical groups:
//! - `tools`: The content tools (summarize, ideas, refine, chat)
//! - `history`: Per-tool history management and recent activity
//! - `account`: Sign-in state
//! - `config`: Configuration and status handlers

mod account;
mod config;
mod history;
mod tools;

pub use account::*;
pub use config::*;
pub use history::*;
pub use tools::*;
