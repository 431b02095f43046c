use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::application::ports::{LlmClient, LlmClientError};
use crate::domain::{DocSummary, MISSING_SUMMARY};
use crate::infrastructure::observability::sanitize_prompt;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

const PROMPT_TEMPLATE: &str = r#"Analyze the following text and provide two things in a clean JSON format:
1. "summary": A concise, abstractive summary (2-4 sentences).
2. "keywords": A list of the 8-10 most important keywords/phrases.

Output only the raw JSON object.

Text:
---
{text}
---
"#;

pub fn build_prompt(text: &str) -> String {
    PROMPT_TEMPLATE.replace("{text}", text)
}

#[derive(Debug, thiserror::Error)]
pub enum ResponseParseError {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("response JSON is not an object")]
    NotAnObject,
}

/// Why a single model attempt did not produce a summary.
#[derive(Debug, thiserror::Error)]
pub enum AttemptError {
    #[error("model call failed: {0}")]
    Call(#[from] LlmClientError),
    #[error("bad model response: {0}")]
    BadResponse(#[from] ResponseParseError),
}

/// What to do after a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    RetryAfter(Duration),
    GiveUp(DocSummary),
}

/// Bounded retry: an answer that is not JSON at all is final; every other
/// failure is retried after a fixed delay until `max_attempts` is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// `attempt` is 1-based.
    pub fn decide(&self, attempt: u32, error: &AttemptError) -> RetryDecision {
        match error {
            AttemptError::BadResponse(ResponseParseError::InvalidJson(_)) => {
                RetryDecision::GiveUp(DocSummary::bad_response())
            }
            _ if attempt >= self.max_attempts => {
                RetryDecision::GiveUp(DocSummary::retries_exhausted())
            }
            _ => RetryDecision::RetryAfter(self.delay),
        }
    }
}

/// Strips optional code fences and reads `summary` / `keywords` from the
/// model's JSON answer.
pub fn parse_model_response(raw: &str) -> Result<DocSummary, ResponseParseError> {
    let trimmed = raw.trim();
    let without_prefix = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let body = without_prefix
        .strip_suffix("```")
        .unwrap_or(without_prefix)
        .trim();

    let value: Value = serde_json::from_str(body)?;
    let object = value.as_object().ok_or(ResponseParseError::NotAnObject)?;

    let summary = match object.get("summary") {
        None | Some(Value::Null) => MISSING_SUMMARY.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    let keywords = match object.get("keywords") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    };

    Ok(DocSummary::new(summary, keywords))
}

pub struct SummarizationService<L>
where
    L: LlmClient,
{
    llm_client: Arc<L>,
    retry_policy: RetryPolicy,
}

impl<L> SummarizationService<L>
where
    L: LlmClient,
{
    pub fn new(llm_client: Arc<L>) -> Self {
        Self::with_retry_policy(llm_client, RetryPolicy::default())
    }

    pub fn with_retry_policy(llm_client: Arc<L>, retry_policy: RetryPolicy) -> Self {
        Self {
            llm_client,
            retry_policy,
        }
    }

    /// Summarizes free text. Never fails: every failure is folded into one of
    /// the fixed error summaries. `image_count` is always 0 here.
    #[tracing::instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn summarize(&self, text: &str) -> DocSummary {
        if text.trim().is_empty() {
            return DocSummary::no_text();
        }

        let prompt = build_prompt(text);
        let mut attempt = 1;

        loop {
            tracing::debug!(attempt, "Calling summarization model");

            let error = match self.attempt(&prompt).await {
                Ok(summary) => {
                    tracing::info!(attempt, keywords = summary.keywords.len(), "Summary parsed");
                    return summary;
                }
                Err(e) => e,
            };

            match self.retry_policy.decide(attempt, &error) {
                RetryDecision::GiveUp(summary) => {
                    tracing::error!(attempt, error = %error, "Summarization failed");
                    return summary;
                }
                RetryDecision::RetryAfter(delay) => {
                    tracing::warn!(
                        attempt,
                        error = %error,
                        delay_ms = delay.as_millis() as u64,
                        "Summarization attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn attempt(&self, prompt: &str) -> Result<DocSummary, AttemptError> {
        let raw = self.llm_client.generate(prompt).await?;

        parse_model_response(&raw).map_err(|e| {
            tracing::warn!(raw_response = %sanitize_prompt(&raw), "Model response is not the expected JSON");
            AttemptError::BadResponse(e)
        })
    }
}
