//! Content tool handlers for Studio CLI

use crate::cli::CliApp;
use crate::cli::args::*;
use crate::error::{Error, Result};
use crate::tools::{Provenance, ToolOutput};
use crate::types::RecordId;
use std::path::PathBuf;

/// Positional text, or the contents of `--file`
fn read_input(text: &Option<String>, file: &Option<PathBuf>) -> Result<String> {
    match (text, file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => Ok(std::fs::read_to_string(path)?),
        (None, None) => Err(Error::invalid_arguments("provide TEXT or --file")),
    }
}

fn print_provenance<V>(app: &CliApp, output: &ToolOutput<V>) {
    if app.quiet {
        return;
    }
    match &output.provenance {
        Provenance::Live => app.verbose_println("Result from content service"),
        Provenance::Fallback { reason } => {
            eprintln!("note: content service unavailable, showing a local placeholder");
            app.verbose_println(&format!("fallback reason: {}", reason));
        }
    }
    app.verbose_println(&format!("Saved as {}", output.record_id));
}

pub async fn handle_summarize(app: &mut CliApp, args: &SummarizeArgs) -> Result<()> {
    let text = read_input(&args.text, &args.file)?;
    let output = app.studio.summarize(&text).await?;

    println!("{}", output.value);
    print_provenance(app, &output);
    Ok(())
}

pub async fn handle_ideas(app: &mut CliApp, args: &IdeasArgs) -> Result<()> {
    let output = app.studio.generate_ideas(&args.topic).await?;

    for (i, idea) in output.value.iter().enumerate() {
        println!("{}. {}", i + 1, idea);
    }
    print_provenance(app, &output);
    Ok(())
}

pub async fn handle_refine(app: &mut CliApp, args: &RefineArgs) -> Result<()> {
    let text = read_input(&args.text, &args.file)?;
    let output = app.studio.refine(&text, &args.instruction).await?;

    println!("{}", output.value);
    print_provenance(app, &output);
    Ok(())
}

pub async fn handle_chat(app: &mut CliApp, args: &ChatArgs) -> Result<()> {
    let session = args.session.as_deref().map(RecordId::from);
    let output = app.studio.chat(session.as_ref(), &args.message).await?;

    println!("{}", output.value);
    print_provenance(app, &output);
    if !app.quiet && session.is_none() {
        println!("\nContinue with: studio chat --session {} <MESSAGE>", output.record_id);
    }
    Ok(())
}
