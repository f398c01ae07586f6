//! Client configuration and factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use coursework_core::traits::TokenStore;

use crate::http::HttpApiClient;
use crate::token_store::{ChainedTokenStore, EnvTokenStore, FileTokenStore};

/// Environment variable overriding `base_url`.
pub const BASE_URL_ENV_VAR: &str = "COURSEWORK_BASE_URL";

/// Top-level coursework configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseworkConfig {
    /// Base URL of the REST API, e.g. `https://lms.example.com/api`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// File holding the bearer token. Defaults to `~/.config/coursework/token`.
    #[serde(default)]
    pub token_file: Option<PathBuf>,
    /// Per-request timeout. Unset means requests may wait indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

impl Default for CourseworkConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token_file: None,
            timeout_secs: None,
        }
    }
}

impl CourseworkConfig {
    /// The token file in effect, falling back to the default location.
    pub fn token_path(&self) -> Option<PathBuf> {
        self.token_file
            .clone()
            .or_else(|| config_dir().map(|d| d.join("token")))
    }

    /// Token store: `COURSEWORK_TOKEN` first, then the token file.
    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        let mut stores: Vec<Arc<dyn TokenStore>> = vec![Arc::new(EnvTokenStore::default())];
        if let Some(path) = self.token_path() {
            stores.push(Arc::new(FileTokenStore::new(path)));
        }
        Arc::new(ChainedTokenStore::new(stores))
    }

    /// Build an HTTP client that authenticates with `tokens`.
    pub fn create_client(&self, tokens: Arc<dyn TokenStore>) -> Result<HttpApiClient> {
        HttpApiClient::new(&self.base_url, tokens, self.timeout_secs)
            .with_context(|| format!("failed to create client for {}", self.base_url))
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are inserted literally and never rescanned.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `coursework.toml` in the current directory
/// 2. `~/.config/coursework/config.toml`
///
/// `COURSEWORK_BASE_URL` overrides `base_url`.
pub fn load_config() -> Result<CourseworkConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<CourseworkConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("coursework.toml");
        if local.exists() {
            Some(local)
        } else {
            config_dir()
                .map(|d| d.join("config.toml"))
                .filter(|p| p.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => CourseworkConfig::default(),
    };

    if let Ok(url) = std::env::var(BASE_URL_ENV_VAR) {
        if !url.is_empty() {
            config.base_url = url;
        }
    }

    Ok(config)
}

/// Parse a TOML config string and resolve `${VAR}` references.
pub fn parse_config(content: &str) -> Result<CourseworkConfig> {
    let mut config: CourseworkConfig = toml::from_str(content)?;
    config.base_url = resolve_env_vars(&config.base_url);
    config.token_file = config
        .token_file
        .map(|p| PathBuf::from(resolve_env_vars(&p.to_string_lossy())));
    anyhow::ensure!(!config.base_url.is_empty(), "base_url must not be empty");
    Ok(config)
}

fn config_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("coursework"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_COURSEWORK_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_COURSEWORK_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_COURSEWORK_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no vars"), "no vars");
        std::env::remove_var("_COURSEWORK_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_inserts_values_literally() {
        std::env::set_var("_COURSEWORK_TEST_SELF", "${_COURSEWORK_TEST_SELF}");
        assert_eq!(
            resolve_env_vars("a/${_COURSEWORK_TEST_SELF}/b"),
            "a/${_COURSEWORK_TEST_SELF}/b"
        );
        std::env::remove_var("_COURSEWORK_TEST_SELF");

        assert_eq!(resolve_env_vars("${_COURSEWORK_TEST_UNSET}x"), "x");
        assert_eq!(resolve_env_vars("open ${brace"), "open ${brace");
    }

    #[test]
    fn default_config() {
        let config = CourseworkConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000/api");
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn parse_full_config() {
        std::env::set_var("_COURSEWORK_TEST_HOST", "lms.example.com");
        let config = parse_config(
            r#"
base_url = "https://${_COURSEWORK_TEST_HOST}/api"
token_file = "/tmp/coursework-token"
timeout_secs = 15
"#,
        )
        .unwrap();
        std::env::remove_var("_COURSEWORK_TEST_HOST");

        assert_eq!(config.base_url, "https://lms.example.com/api");
        assert_eq!(
            config.token_path(),
            Some(PathBuf::from("/tmp/coursework-token"))
        );
        assert_eq!(config.timeout_secs, Some(15));
    }

    #[test]
    fn parse_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, CourseworkConfig::default());
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/coursework.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_from_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coursework.toml");
        std::fs::write(&path, "base_url = \"http://example.test/api\"\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        if std::env::var(BASE_URL_ENV_VAR).is_err() {
            assert_eq!(config.base_url, "http://example.test/api");
        }
    }

    #[test]
    fn token_store_reads_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "a.b.c").unwrap();

        let config = CourseworkConfig {
            token_file: Some(path),
            ..Default::default()
        };
        if std::env::var(crate::token_store::TOKEN_ENV_VAR).is_err() {
            assert_eq!(config.token_store().read().as_deref(), Some("a.b.c"));
        }
    }
}
