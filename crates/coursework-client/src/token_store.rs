//! Token stores backed by the environment and the filesystem.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use coursework_core::traits::TokenStore;

/// Environment variable consulted before the token file.
pub const TOKEN_ENV_VAR: &str = "COURSEWORK_TOKEN";

/// Reads the token from a file written by the login flow.
///
/// A missing, unreadable or blank file means "not logged in".
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn read(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => non_blank(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("failed to read token file {}: {e}", self.path.display());
                None
            }
        }
    }
}

/// Reads the token from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvTokenStore {
    var: String,
}

impl EnvTokenStore {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvTokenStore {
    fn default() -> Self {
        Self::new(TOKEN_ENV_VAR)
    }
}

impl TokenStore for EnvTokenStore {
    fn read(&self) -> Option<String> {
        std::env::var(&self.var).ok().and_then(non_blank)
    }
}

/// Tries each store in order and returns the first token found.
#[derive(Clone, Default)]
pub struct ChainedTokenStore {
    stores: Vec<Arc<dyn TokenStore>>,
}

impl ChainedTokenStore {
    pub fn new(stores: Vec<Arc<dyn TokenStore>>) -> Self {
        Self { stores }
    }
}

impl TokenStore for ChainedTokenStore {
    fn read(&self) -> Option<String> {
        self.stores.iter().find_map(|s| s.read())
    }
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
