//! coursework-client: HTTP access to the coursework backend.
//!
//! Implements the core `ApiClient` trait over reqwest, provides the token
//! stores the CLI authenticates with, and loads `coursework.toml`.

pub mod config;
pub mod http;
pub mod token_store;

pub use config::{load_config, load_config_from, CourseworkConfig};
pub use http::HttpApiClient;
pub use token_store::{ChainedTokenStore, EnvTokenStore, FileTokenStore};
