//! Configuration and status handlers for Studio CLI

use crate::cli::CliApp;
use crate::cli::args::*;
use crate::config::Config;
use crate::error::Result;
use crate::tools::ToolKind;

pub fn handle_config(app: &mut CliApp, args: &ConfigArgs) -> Result<()> {
    if args.show {
        let config_json = serde_json::to_string_pretty(&app.config)?;
        println!("{}", config_json);
    } else if args.init {
        let config_path = match &app.config_path {
            Some(path) => path.clone(),
            None => Config::default_config_path()?,
        };
        Config::default().save_to_path(&config_path)?;
        println!("Configuration initialized at {}", config_path.display());
    } else if args.validate {
        match app.config.validate() {
            Ok(_) => println!("Configuration is valid"),
            Err(e) => println!("Configuration validation failed: {}", e),
        }
    } else {
        println!("Use --show, --init, or --validate");
    }

    Ok(())
}

pub async fn handle_status(app: &mut CliApp) -> Result<()> {
    let status = app.studio.status().await;

    println!("Studio Status");
    println!("=============");
    println!(
        "Content service: {} ({})",
        if status.connected {
            "connected"
        } else {
            "disconnected, using local fallbacks"
        },
        status.url
    );
    println!(
        "Storage: {:?} at {}",
        app.config.storage.backend,
        app.config.storage.path.display()
    );
    match app.studio.principal() {
        Some(principal) => println!("Signed in as: {}", principal.name()),
        None => println!("Signed in as: (nobody)"),
    }

    println!("\nHistory");
    println!("=======");
    for tool in ToolKind::ALL {
        let (used, max) = app.studio.usage(tool);
        println!("  {:<16} {:>3} / {}", tool.title(), used, max);
    }

    Ok(())
}
