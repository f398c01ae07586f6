//! Subcommand implementations and the plumbing they share.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use coursework_client::config::load_config_from;
use coursework_core::traits::{ApiClient, Confirm, TokenStore};

pub mod assessments;
pub mod courses;
pub mod init;
pub mod results;
pub mod take;
pub mod whoami;

/// Everything a command needs to talk to the backend.
pub struct Session {
    pub client: Arc<dyn ApiClient>,
    pub tokens: Arc<dyn TokenStore>,
}

impl Session {
    pub fn connect(config_path: Option<PathBuf>) -> Result<Self> {
        let config = load_config_from(config_path.as_deref())?;
        let tokens = config.token_store();
        let client = config.create_client(Arc::clone(&tokens))?;
        tracing::debug!(base_url = %client.base_url(), "session ready");
        Ok(Self {
            client: Arc::new(client),
            tokens,
        })
    }
}

/// Yes/no prompt on stderr, answered on stdin. Defaults to "no".
pub struct StdinConfirm {
    pub assume_yes: bool,
}

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        let answer = prompt_line(&format!("{prompt} [y/N] ")).unwrap_or_default();
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

/// Print `prompt` to stderr and read one line from stdin.
///
/// Returns `None` at end of input.
pub fn prompt_line(prompt: &str) -> Option<String> {
    eprint!("{prompt}");
    let _ = std::io::stderr().flush();

    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}
