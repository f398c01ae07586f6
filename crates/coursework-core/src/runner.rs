//! Assessment runner: loads one assessment, collects single-choice answers,
//! scores them and submits a result record.
//!
//! State machine:
//!
//! ```text
//! Loading --load ok--> Ready --submit ok--> Submitted
//!    |                  ^  |
//!    +--load err--> Error  +--submit err (answers kept)
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::instrument;

use crate::error::{ApiError, RunnerError};
use crate::identity::current_user_id;
use crate::model::{Assessment, NewResult, Question, ResultRecord, Route};
use crate::scoring::{self, AnswerSelection};
use crate::traits::{get_json, post_json, ApiClient, TokenStore};

/// Where the runner is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerState {
    Loading,
    /// Loading failed; holds the message shown to the user.
    Error(String),
    Ready,
    Submitted,
}

impl RunnerState {
    fn name(&self) -> &'static str {
        match self {
            RunnerState::Loading => "loading",
            RunnerState::Error(_) => "error",
            RunnerState::Ready => "ready",
            RunnerState::Submitted => "submitted",
        }
    }
}

impl fmt::Display for RunnerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What happened on a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub score: u32,
    /// The stored record, when the server echoed one back.
    pub result: Option<ResultRecord>,
    /// Confirmation shown to the user.
    pub message: &'static str,
    /// Where to go next.
    pub next: Route,
}

/// Drives a single attempt at an assessment.
pub struct AssessmentRunner {
    client: Arc<dyn ApiClient>,
    tokens: Arc<dyn TokenStore>,
    assessment_id: String,
    state: RunnerState,
    assessment: Option<Assessment>,
    questions: Vec<Question>,
    answers: AnswerSelection,
}

impl AssessmentRunner {
    pub fn new(
        client: Arc<dyn ApiClient>,
        tokens: Arc<dyn TokenStore>,
        assessment_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            tokens,
            assessment_id: assessment_id.into(),
            state: RunnerState::Loading,
            assessment: None,
            questions: Vec::new(),
            answers: AnswerSelection::new(),
        }
    }

    /// Fetch the assessment and normalize its questions.
    ///
    /// On failure the runner halts in [`RunnerState::Error`]; nothing is
    /// retried.
    #[instrument(skip(self), fields(assessment_id = %self.assessment_id))]
    pub async fn load(&mut self) -> Result<(), RunnerError> {
        self.state = RunnerState::Loading;

        match self.fetch().await {
            Ok((assessment, questions)) => {
                tracing::debug!(questions = questions.len(), "assessment loaded");
                self.assessment = Some(assessment);
                self.questions = questions;
                self.state = RunnerState::Ready;
                Ok(())
            }
            Err(e) => {
                tracing::error!("failed to load assessment: {e}");
                let err = RunnerError::Load(e);
                self.state = RunnerState::Error(err.to_string());
                Err(err)
            }
        }
    }

    async fn fetch(&self) -> Result<(Assessment, Vec<Question>), ApiError> {
        let path = format!("/Assessments/{}", urlencoding::encode(&self.assessment_id));
        let assessment: Assessment = get_json(self.client.as_ref(), &path).await?;
        let questions = assessment
            .questions()
            .map_err(|e| ApiError::Decode(format!("questions: {e}")))?;
        Ok((assessment, questions))
    }

    /// Record (or overwrite) the selected option for a question.
    ///
    /// Indices are not validated; an out-of-range option simply never
    /// matches the answer.
    pub fn select_option(&mut self, question_index: usize, option_index: usize) {
        self.answers.insert(question_index, option_index);
    }

    /// Score of the current selection.
    pub fn score(&self) -> u32 {
        scoring::score(&self.questions, &self.answers)
    }

    /// Score the answers and submit a result for the current user.
    ///
    /// Without a resolvable user no request is made and the error redirects
    /// to [`Route::Login`]. A failed submission leaves the runner `Ready`
    /// with its answers intact, so the caller may retry.
    #[instrument(skip(self), fields(assessment_id = %self.assessment_id))]
    pub async fn submit(&mut self) -> Result<SubmitOutcome, RunnerError> {
        if self.state != RunnerState::Ready {
            return Err(RunnerError::NotReady(self.state.name()));
        }

        let Some(user_id) = current_user_id(self.tokens.as_ref()) else {
            tracing::warn!("submission blocked: no user identity in token store");
            return Err(RunnerError::NotAuthenticated);
        };

        let body = NewResult {
            assessment_id: self.assessment_id.clone(),
            user_id,
            score: self.score(),
        };
        tracing::debug!(?body, "submitting result");

        match post_json(self.client.as_ref(), "/Results", &body).await {
            Ok(response) => {
                self.state = RunnerState::Submitted;
                tracing::info!(score = body.score, "assessment submitted");
                Ok(SubmitOutcome {
                    score: body.score,
                    result: serde_json::from_value(response).ok(),
                    message: "Assessment submitted!",
                    next: Route::Results,
                })
            }
            Err(e) => {
                tracing::error!("error submitting assessment: {e}");
                Err(RunnerError::Submission(e))
            }
        }
    }

    pub fn state(&self) -> &RunnerState {
        &self.state
    }

    pub fn assessment_id(&self) -> &str {
        &self.assessment_id
    }

    pub fn assessment(&self) -> Option<&Assessment> {
        self.assessment.as_ref()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &AnswerSelection {
        &self.answers
    }

    pub fn is_answered(&self, question_index: usize) -> bool {
        self.answers.contains_key(&question_index)
    }

    /// Number of questions with a selection.
    pub fn answered_count(&self) -> usize {
        (0..self.questions.len())
            .filter(|i| self.is_answered(*i))
            .count()
    }
}
