//! The `coursework whoami` command.

use std::path::PathBuf;

use anyhow::Result;

use coursework_client::config::load_config_from;
use coursework_core::identity::inspect_token;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let Some(token) = config.token_store().read() else {
        println!("Not logged in.");
        return Ok(());
    };

    let Some(claims) = inspect_token(&token) else {
        println!("Stored token carries no user identity.");
        return Ok(());
    };

    println!("User: {}", claims.user_id);
    match claims.expires_at {
        Some(exp) if exp < chrono::Utc::now() => println!("Expires: {exp} (expired)"),
        Some(exp) => println!("Expires: {exp}"),
        None => println!("Expires: (no exp claim)"),
    }
    println!("Note: the token signature is not verified locally; the server decides.");

    Ok(())
}
