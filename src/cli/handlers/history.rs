//! History handlers for Studio CLI

use crate::cli::CliApp;
use crate::cli::args::*;
use crate::error::{Error, Result};
use crate::export::DirectorySink;
use crate::tools::{Role, ToolKind, preview};
use crate::types::RecordId;
use std::io::{self, Write};

/// Width of the prompt column in listings
const PREVIEW_CHARS: usize = 60;

pub fn handle_history(app: &mut CliApp, args: &HistoryArgs) -> Result<()> {
    let tool = args.tool;
    match &args.action {
        HistoryAction::List { timestamps } => list(app, tool, *timestamps),
        HistoryAction::Show { id } => show(app, tool, &RecordId::from(id.as_str())),
        HistoryAction::Remove { id } => remove(app, tool, &RecordId::from(id.as_str())),
        HistoryAction::Clear { force } => clear(app, tool, *force),
        HistoryAction::Export { output } => {
            let dir = output
                .clone()
                .unwrap_or_else(|| app.config.export.directory.clone());
            let sink = DirectorySink::new(&dir);
            let name = app.studio.export(tool, &sink)?;
            let path = sink.written(&name).ok_or_else(|| {
                Error::custom(format!(
                    "failed to export {} history to {}",
                    tool,
                    dir.join(&name).display()
                ))
            })?;
            if !app.quiet {
                println!("Exported {} history to {}", tool, path.display());
            }
            Ok(())
        }
    }
}

fn list(app: &CliApp, tool: ToolKind, timestamps: bool) -> Result<()> {
    let entries = app.studio.history(tool)?;

    if entries.is_empty() {
        if !app.quiet {
            println!("No {} history available yet.", tool);
        }
        return Ok(());
    }

    for entry in &entries {
        let prompt = preview(&entry.prompt.replace('\n', " "), PREVIEW_CHARS);
        if timestamps {
            println!(
                "{}  {}  {}",
                entry.id,
                entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                prompt
            );
        } else {
            println!("{}  {}", entry.id, prompt);
        }
    }

    if !app.quiet {
        let (used, max) = app.studio.usage(tool);
        println!("\n{} of {} entries", used, max);
    }
    Ok(())
}

fn show(app: &CliApp, tool: ToolKind, id: &RecordId) -> Result<()> {
    if tool == ToolKind::Chatbot {
        let session = app.studio.chat_session(id)?;
        println!("{} ({})", session.payload.title, session.formatted_timestamp());
        println!();
        for message in &session.payload.messages {
            let who = match message.role {
                Role::User => "you",
                Role::Assistant => "assistant",
            };
            println!("[{}] {}", who, message.content);
        }
        return Ok(());
    }

    let entry = app.studio.detail(tool, id)?;
    println!("{} - {}", tool.title(), entry.timestamp.format("%Y-%m-%d %H:%M:%S"));
    println!("\nPrompt:\n{}", entry.prompt);
    println!("\nResponse:\n{}", entry.response);
    Ok(())
}

fn remove(app: &mut CliApp, tool: ToolKind, id: &RecordId) -> Result<()> {
    if !app.studio.remove(tool, id)? {
        return Err(Error::RecordNotFound {
            key: tool.storage_key().to_string(),
            id: id.to_string(),
        });
    }
    if !app.quiet {
        println!("Removed {} from {} history", id, tool);
    }
    Ok(())
}

fn clear(app: &mut CliApp, tool: ToolKind, force: bool) -> Result<()> {
    if !force {
        print!("Are you sure you want to clear the {} history? (y/N): ", tool);
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted");
            return Ok(());
        }
    }

    app.studio.clear(tool)?;

    if !app.quiet {
        println!("{} history cleared successfully", tool.title());
    }
    Ok(())
}

pub fn handle_recent(app: &mut CliApp, args: &RecentArgs) -> Result<()> {
    let entries = app.studio.recent_activity(args.limit)?;

    if entries.is_empty() && !app.quiet {
        println!("No activity yet.");
    }

    for entry in entries {
        println!(
            "{}  {:<10}  {}  {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.tool,
            entry.id,
            preview(&entry.prompt.replace('\n', " "), PREVIEW_CHARS)
        );
    }

    Ok(())
}
