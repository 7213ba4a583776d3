//! Conversation summarization seam.
//!
//! A `Summarizer` never errors: any failure the engine should treat as
//! "no summary available" (remote error, timeout, blank response) folds
//! into `None`, and the caller falls back to truncation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::warn;

use banter_core::Message;

use crate::{AIProvider, GenerateRequest};

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize an ordered message list under a token ceiling.
    async fn summarize(&self, messages: &[Message], max_tokens: usize) -> Option<String>;
}

/// Summarizer backed by any `AIProvider`.
pub struct ProviderSummarizer<P> {
    provider: P,
    model: Option<String>,
}

impl<P: AIProvider> ProviderSummarizer<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            model: None,
        }
    }

    /// Route summarization to a specific (typically lightweight) model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    fn build_prompt(messages: &[Message], max_tokens: usize) -> String {
        let mut transcript = String::new();
        for message in messages {
            transcript.push_str(message.role.as_str());
            transcript.push_str(": ");
            transcript.push_str(&message.content);
            transcript.push_str("\n\n");
        }

        // The ceiling is a token budget; word counts are close enough as a
        // hint for the model.
        format!(
            "Summarize the following conversation in at most {} words, \
             preserving decisions, facts, and open questions:\n\n{}",
            (max_tokens * 3) / 4,
            transcript
        )
    }
}

#[async_trait]
impl<P: AIProvider> Summarizer for ProviderSummarizer<P> {
    async fn summarize(&self, messages: &[Message], max_tokens: usize) -> Option<String> {
        if messages.is_empty() {
            return None;
        }

        let request = GenerateRequest {
            prompt: Self::build_prompt(messages, max_tokens),
            model: self.model.clone(),
            max_tokens: Some(max_tokens as u32),
            temperature: Some(0.3),
        };

        match self.provider.generate(request).await {
            Ok(response) => {
                let text = response.content.trim();
                if text.is_empty() {
                    None
                } else {
                    Some(text.to_string())
                }
            }
            Err(err) => {
                warn!(provider = self.provider.name(), %err, "summarization failed");
                None
            }
        }
    }
}

/// Scripted summarizer for tests: replays queued outcomes and counts calls.
#[derive(Default)]
pub struct MockSummarizer {
    outcomes: Mutex<Vec<Option<String>>>,
    calls: AtomicUsize,
}

impl MockSummarizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Summarizer that answers every call with the same text.
    pub fn always(text: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.outcomes
            .lock()
            .expect("mock outcomes poisoned")
            .push(Some(text.into()));
        mock
    }

    /// Summarizer that answers every call with `None`.
    pub fn unavailable() -> Self {
        let mock = Self::new();
        mock.outcomes
            .lock()
            .expect("mock outcomes poisoned")
            .push(None);
        mock
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, _messages: &[Message], _max_tokens: usize) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .expect("mock outcomes poisoned")
            .first()
            .cloned()
            .flatten()
    }
}
