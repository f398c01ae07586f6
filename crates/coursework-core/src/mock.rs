//! Mock API client for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use base64::Engine;
use serde_json::Value;

use crate::error::ApiError;
use crate::identity::USER_ID_CLAIM;
use crate::traits::ApiClient;

/// HTTP method of a recorded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
}

/// A request received by [`MockApiClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// An in-memory `ApiClient` that answers from canned responses keyed by
/// method and path, and records every call it receives.
///
/// Unregistered routes answer with [`ApiError::NotFound`].
#[derive(Default)]
pub struct MockApiClient {
    responses: Mutex<HashMap<(Method, String), Result<Value, ApiError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockApiClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a response (builder style).
    pub fn on(self, method: Method, path: &str, response: Result<Value, ApiError>) -> Self {
        self.set(method, path, response);
        self
    }

    /// Register or replace a response.
    pub fn set(&self, method: Method, path: &str, response: Result<Value, ApiError>) {
        self.responses
            .lock()
            .unwrap()
            .insert((method, path.to_string()), response);
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Number of calls made with the given method.
    pub fn count(&self, method: Method) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    fn respond(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            body,
        });
        self.responses
            .lock()
            .unwrap()
            .get(&(method, path.to_string()))
            .cloned()
            .unwrap_or_else(|| Err(ApiError::NotFound(path.to_string())))
    }
}

#[async_trait]
impl ApiClient for MockApiClient {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.respond(Method::Get, path, None)
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.respond(Method::Post, path, Some(body.clone()))
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.respond(Method::Delete, path, None).map(|_| ())
    }
}

/// Build an unsigned three-segment token whose payload carries `user_id`
/// in the identity claim.
pub fn unsigned_token(user_id: &str) -> String {
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let header = engine.encode(r#"{"alg":"none","typ":"JWT"}"#);
    let mut claims = serde_json::Map::new();
    claims.insert(USER_ID_CLAIM.to_string(), Value::from(user_id));
    let payload = engine.encode(Value::Object(claims).to_string());
    format!("{header}.{payload}.")
}
