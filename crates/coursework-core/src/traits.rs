//! Collaborator traits: the REST API, the local token store, and the
//! interactive confirmation prompt.
//!
//! The HTTP implementation of `ApiClient` lives in `coursework-client`;
//! the in-memory one used by tests lives in [`crate::mock`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

// ---------------------------------------------------------------------------
// API client trait
// ---------------------------------------------------------------------------

/// A thin wrapper over the backend's REST API.
///
/// Paths are relative to the configured base URL (e.g. `/Courses`).
/// Implementations inject authentication themselves.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// `GET path`, returning the decoded JSON body.
    async fn get(&self, path: &str) -> Result<Value, ApiError>;

    /// `POST path` with a JSON body, returning the decoded JSON response
    /// (`Value::Null` for empty bodies).
    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError>;

    /// `DELETE path`.
    async fn delete(&self, path: &str) -> Result<(), ApiError>;
}

/// `GET path` and deserialize the body into `T`.
pub async fn get_json<T: DeserializeOwned>(
    client: &dyn ApiClient,
    path: &str,
) -> Result<T, ApiError> {
    let value = client.get(path).await?;
    serde_json::from_value(value).map_err(|e| ApiError::Decode(format!("{path}: {e}")))
}

/// Serialize `body` and `POST` it to `path`.
pub async fn post_json<B: Serialize>(
    client: &dyn ApiClient,
    path: &str,
    body: &B,
) -> Result<Value, ApiError> {
    let body = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    client.post(path, &body).await
}

// ---------------------------------------------------------------------------
// Token store trait
// ---------------------------------------------------------------------------

/// Local persistent storage holding the bearer token written by the login
/// flow.
pub trait TokenStore: Send + Sync {
    /// The stored token, or `None` if nobody is logged in.
    fn read(&self) -> Option<String>;
}

/// A token store with a fixed value.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenStore(Option<String>);

impl StaticTokenStore {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn empty() -> Self {
        Self(None)
    }
}

impl TokenStore for StaticTokenStore {
    fn read(&self) -> Option<String> {
        self.0.clone()
    }
}

// ---------------------------------------------------------------------------
// Confirmation prompt
// ---------------------------------------------------------------------------

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Answers every prompt the same way.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}
