//! Core data model types for coursework.
//!
//! Field names follow the backend's JSON: camelCase for records, PascalCase
//! inside question payloads. Identifiers may arrive as JSON strings or
//! numbers and are always held as strings.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A course offered by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(alias = "id", deserialize_with = "id_string")]
    pub course_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Link to an image or other media for the course card.
    #[serde(default)]
    pub media_url: Option<String>,
}

/// How a course's media reference should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Link,
    None,
}

const IMAGE_EXTENSIONS: &[&str] = &[".jpeg", ".jpg", ".png", ".gif", ".webp", ".svg"];

impl Course {
    pub fn media_kind(&self) -> MediaKind {
        match self.media_url.as_deref().filter(|u| !u.is_empty()) {
            None => MediaKind::None,
            Some(url) => {
                let lower = url.to_lowercase();
                if IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
                    MediaKind::Image
                } else {
                    MediaKind::Link
                }
            }
        }
    }
}

/// An assessment belonging to a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    #[serde(alias = "assessmentId", deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub course_id: Option<String>,
    /// Questions as delivered by the backend; see [`Assessment::questions`].
    #[serde(default)]
    pub questions: Option<QuestionsPayload>,
}

impl Assessment {
    /// Normalize the question payload into a single representation.
    ///
    /// A missing, `null` or empty-string payload yields no questions.
    pub fn questions(&self) -> Result<Vec<Question>, serde_json::Error> {
        match &self.questions {
            None => Ok(Vec::new()),
            Some(payload) => payload.normalize(),
        }
    }

    /// Title for display, empty titles count as missing.
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }
}

/// The `questions` field arrives either as a JSON-encoded string or as a
/// structured array.
///
/// Any other shape is kept verbatim in `Unrecognized` so that decoding an
/// assessment never fails because of its questions; the error surfaces
/// from [`QuestionsPayload::normalize`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionsPayload {
    Raw(String),
    Parsed(Vec<Question>),
    Unrecognized(serde_json::Value),
}

impl QuestionsPayload {
    pub fn normalize(&self) -> Result<Vec<Question>, serde_json::Error> {
        match self {
            QuestionsPayload::Raw(text) if text.is_empty() => Ok(Vec::new()),
            QuestionsPayload::Raw(text) => serde_json::from_str(text),
            QuestionsPayload::Parsed(questions) => Ok(questions.clone()),
            QuestionsPayload::Unrecognized(value) => serde_json::from_value(value.clone()),
        }
    }
}

impl Default for QuestionsPayload {
    fn default() -> Self {
        QuestionsPayload::Parsed(Vec::new())
    }
}

/// A single-choice question. `answer` holds the text of the correct option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "Question", alias = "question", default)]
    pub prompt: String,
    #[serde(rename = "Options", alias = "options", default)]
    pub options: Vec<String>,
    #[serde(rename = "Answer", alias = "answer", default)]
    pub answer: String,
}

/// A stored result as returned by `GET /Results`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    #[serde(default, deserialize_with = "opt_id_string")]
    pub result_id: Option<String>,
    #[serde(deserialize_with = "id_string")]
    pub assessment_id: String,
    #[serde(deserialize_with = "id_string")]
    pub user_id: String,
    #[serde(default)]
    pub score: i64,
}

/// Body of `POST /Results`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResult {
    pub assessment_id: String,
    pub user_id: String,
    pub score: u32,
}

/// A result paired with the title of its assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedResult {
    #[serde(flatten)]
    pub result: ResultRecord,
    pub assessment_title: String,
}

/// Navigation targets handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Results,
    TakeAssessment(String),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Login => write!(f, "/login"),
            Route::Results => write!(f, "/results"),
            Route::TakeAssessment(id) => write!(f, "/take-assessment/{id}"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

fn opt_id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Option::<RawId>::deserialize(deserializer).map(|raw| raw.map(String::from))
}
