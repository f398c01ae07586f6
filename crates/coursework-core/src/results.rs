//! Results viewer: the current user's results, each labelled with its
//! assessment's title.

use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use tracing::instrument;

use crate::error::{ApiError, ResultsError};
use crate::identity::current_user_id;
use crate::model::{EnrichedResult, ResultRecord};
use crate::traits::{get_json, ApiClient, TokenStore};

/// Title used when the assessment lookup fails.
pub const NOT_FOUND_TITLE: &str = "Assessment not found";
/// Title used when the assessment exists but has no title.
pub const UNTITLED_TITLE: &str = "Untitled Assessment";

/// Run `task` for every item concurrently and wait for all of them.
///
/// A failed task is replaced by `fallback(item, error)`; other tasks are
/// unaffected. Output order matches input order.
pub async fn join_with_fallback<T, U, E, F, Fut, G>(items: &[T], task: F, fallback: G) -> Vec<U>
where
    F: Fn(&T) -> Fut,
    Fut: Future<Output = Result<U, E>>,
    G: Fn(&T, E) -> U,
{
    let outcomes = join_all(items.iter().map(&task)).await;
    items
        .iter()
        .zip(outcomes)
        .map(|(item, outcome)| outcome.unwrap_or_else(|e| fallback(item, e)))
        .collect()
}

/// Keep the results belonging to `user_id`.
pub fn results_for_user(results: Vec<ResultRecord>, user_id: &str) -> Vec<ResultRecord> {
    results
        .into_iter()
        .filter(|r| r.user_id == user_id)
        .collect()
}

/// Decode each record on its own. A record that does not fit (for example
/// one with a `null` or missing `userId`) belongs to nobody and is dropped.
fn decode_records(values: Vec<Value>) -> Vec<ResultRecord> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!("skipping malformed result record: {e}");
                None
            }
        })
        .collect()
}

/// Loads and enriches the current user's results.
pub struct ResultsViewer {
    client: Arc<dyn ApiClient>,
    tokens: Arc<dyn TokenStore>,
    results: Vec<EnrichedResult>,
}

impl ResultsViewer {
    pub fn new(client: Arc<dyn ApiClient>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            client,
            tokens,
            results: Vec::new(),
        }
    }

    /// Fetch all results, keep the current user's, and look up each
    /// assessment's title concurrently.
    ///
    /// Without a resolvable user nothing is fetched and the list is empty.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<&[EnrichedResult], ResultsError> {
        let Some(user_id) = current_user_id(self.tokens.as_ref()) else {
            tracing::warn!("no user identity, skipping results fetch");
            self.results.clear();
            return Ok(&self.results);
        };

        let all: Vec<Value> = get_json(self.client.as_ref(), "/Results")
            .await
            .map_err(|e| {
                tracing::error!("failed to load results: {e}");
                ResultsError::Load(e)
            })?;
        let mine = results_for_user(decode_records(all), &user_id);
        tracing::debug!(count = mine.len(), "results for current user");

        let client = &self.client;
        let titles = join_with_fallback(
            &mine,
            |r: &ResultRecord| {
                let client = Arc::clone(client);
                let assessment_id = r.assessment_id.clone();
                async move { assessment_title(client.as_ref(), &assessment_id).await }
            },
            |r: &ResultRecord, e: ApiError| {
                tracing::warn!("assessment {} lookup failed: {e}", r.assessment_id);
                NOT_FOUND_TITLE.to_string()
            },
        )
        .await;

        self.results = mine
            .into_iter()
            .zip(titles)
            .map(|(result, assessment_title)| EnrichedResult {
                result,
                assessment_title,
            })
            .collect();
        Ok(&self.results)
    }

    pub fn results(&self) -> &[EnrichedResult] {
        &self.results
    }
}

async fn assessment_title(client: &dyn ApiClient, assessment_id: &str) -> Result<String, ApiError> {
    let path = format!("/Assessments/{}", urlencoding::encode(assessment_id));
    let body: Value = get_json(client, &path).await?;
    Ok(body
        .get("title")
        .and_then(|t| t.as_str())
        .filter(|t| !t.is_empty())
        .unwrap_or(UNTITLED_TITLE)
        .to_string())
}
