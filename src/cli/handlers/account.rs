//! Sign-in handlers for Studio CLI

use crate::auth::Principal;
use crate::cli::CliApp;
use crate::cli::args::*;
use crate::error::Result;

pub fn handle_login(app: &mut CliApp, args: &LoginArgs) -> Result<()> {
    let principal = Principal {
        display_name: args.name.clone(),
        email: args.email.clone(),
        photo_url: args.photo.clone(),
    };
    app.studio.identity().sign_in(&principal)?;

    if !app.quiet {
        println!("Signed in as {}.", principal.name());
    }
    Ok(())
}

pub fn handle_logout(app: &mut CliApp) -> Result<()> {
    app.studio.identity().sign_out()?;
    if !app.quiet {
        println!("Signed out.");
    }
    Ok(())
}

pub fn handle_whoami(app: &mut CliApp) -> Result<()> {
    match app.studio.principal() {
        Some(principal) => {
            println!("{} <{}>", principal.name(), principal.email);
            if let Some(photo) = &principal.photo_url {
                app.verbose_println(&format!("photo: {}", photo));
            }
        }
        None => println!("Not signed in"),
    }
    Ok(())
}
