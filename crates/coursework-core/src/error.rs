//! Error types for API calls and the components built on them.
//!
//! `ApiError` lives in core so that every component can classify transport
//! failures without string matching, whichever `ApiClient` produced them.

use thiserror::Error;

use crate::model::Route;

/// Errors returned by an [`ApiClient`](crate::traits::ApiClient).
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The API rejected the bearer token (HTTP 401/403).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The requested resource does not exist (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The API returned any other error status.
    #[error("API error (HTTP {status}): {message}")]
    Status { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The response body could not be decoded into the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message suitable for showing to the user.
    ///
    /// Error bodies of the form `{"message": "..."}` carry the server's own
    /// explanation, which is preferred over the transport-level text.
    pub fn user_message(&self) -> String {
        let body = match self {
            ApiError::Unauthorized(body)
            | ApiError::NotFound(body)
            | ApiError::Status { message: body, .. } => body.as_str(),
            _ => return self.to_string(),
        };
        server_message(body).unwrap_or_else(|| self.to_string())
    }

    /// HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::NotFound(_) => Some(404),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(|m| m.as_str())
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Errors surfaced by the assessment runner.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The assessment could not be fetched or its questions could not be parsed.
    #[error("Failed to load assessment.")]
    Load(#[source] ApiError),

    /// No user identifier could be resolved from the stored token.
    #[error("User not authenticated")]
    NotAuthenticated,

    /// The result record was rejected or never reached the server.
    #[error("Submission failed: {}", .0.user_message())]
    Submission(#[source] ApiError),

    /// The operation is not valid in the runner's current state.
    #[error("assessment is not ready (state: {0})")]
    NotReady(&'static str),
}

impl RunnerError {
    /// Where the user should be sent after this error, if anywhere.
    pub fn redirect(&self) -> Option<Route> {
        match self {
            RunnerError::NotAuthenticated => Some(Route::Login),
            _ => None,
        }
    }
}

/// Errors surfaced by the course and assessment directories.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Failed to load courses. Please try again.")]
    LoadCourses(#[source] ApiError),

    #[error("Failed to load assessments.")]
    LoadAssessments(#[source] ApiError),

    #[error("Failed to delete course.")]
    DeleteCourse(#[source] ApiError),

    #[error("Failed to delete assessment.")]
    DeleteAssessment(#[source] ApiError),

    #[error("no course with id {0}")]
    UnknownCourse(String),
}

/// Errors surfaced by the results viewer.
#[derive(Debug, Error)]
pub enum ResultsError {
    #[error("Failed to load results.")]
    Load(#[source] ApiError),
}
