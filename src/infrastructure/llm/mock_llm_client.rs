use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::application::ports::{LlmClient, LlmClientError};

/// Replays scripted responses in order; once the script runs out, keeps
/// returning the last one. Counts calls.
pub struct MockLlmClient {
    responses: Mutex<VecDeque<Result<String, LlmClientError>>>,
    last: Mutex<Result<String, LlmClientError>>,
    calls: AtomicUsize,
}

impl MockLlmClient {
    pub fn new(responses: Vec<Result<String, LlmClientError>>) -> Self {
        let last = responses.last().cloned().unwrap_or_else(|| {
            Ok(r#"{"summary": "Mock summary.", "keywords": ["mock"]}"#.to_string())
        });
        Self {
            responses: Mutex::new(responses.into()),
            last: Mutex::new(last),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn answering(response: &str) -> Self {
        Self::new(vec![Ok(response.to_string())])
    }

    pub fn failing(error: LlmClientError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    async fn generate(&self, _prompt: &str) -> Result<String, LlmClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let next = self
            .responses
            .lock()
            .map_err(|_| LlmClientError::ApiRequestFailed("mock poisoned".to_string()))?
            .pop_front();

        match next {
            Some(response) => response,
            None => self
                .last
                .lock()
                .map_err(|_| LlmClientError::ApiRequestFailed("mock poisoned".to_string()))?
                .clone(),
        }
    }
}
