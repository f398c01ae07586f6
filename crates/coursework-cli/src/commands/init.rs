//! The `coursework init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("coursework.toml").exists() {
        println!("coursework.toml already exists, skipping.");
    } else {
        std::fs::write("coursework.toml", SAMPLE_CONFIG)?;
        println!("Created coursework.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit coursework.toml with your API base URL");
    println!("  2. Log in and save the token to ~/.config/coursework/token (or set COURSEWORK_TOKEN)");
    println!("  3. Run: coursework courses list");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# coursework configuration

# Base URL of the REST API (COURSEWORK_BASE_URL overrides this)
base_url = "http://localhost:5000/api"

# File holding the bearer token written by the login flow
# token_file = "${HOME}/.config/coursework/token"

# Per-request timeout in seconds (unset = wait indefinitely)
# timeout_secs = 30
"#;
