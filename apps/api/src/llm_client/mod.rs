//! Completion client. Every call to the hosted language model goes through here.
//!
//! The prompt token budget is checked before any network traffic. Transient
//! upstream failures are retried a bounded number of times, and the cost of
//! every successful completion is recorded in the ledger.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::cost::{CostLedger, ModelTier};

pub mod openai;
pub mod prompts;
pub mod tokenizer;

pub use openai::OpenAiBackend;
pub use tokenizer::{Cl100kCounter, TokenCounter};

/// Prompt plus response may not exceed this many tokens.
pub const TOKEN_CEILING: usize = 4000;
/// Total attempts per completion: one initial call plus four retries.
pub const MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(1);
const TEMPERATURE: f32 = 0.1;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("prompt is {prompt_tokens} tokens, leaving no room for a response within {ceiling}")]
    BudgetExceeded { prompt_tokens: usize, ceiling: usize },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("upstream failed after {attempts} attempts: {last}")]
    Upstream {
        attempts: u32,
        #[source]
        last: Box<LlmError>,
    },

    #[error("tokenizer unavailable: {0}")]
    Tokenizer(String),
}

impl LlmError {
    /// Transport failures, rate limits, server errors and unusable responses
    /// are worth another attempt. Other 4xx (bad key, malformed request) and
    /// client-side request construction errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request() || e.is_body(),
            LlmError::Parse(_) | LlmError::EmptyContent => true,
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            LlmError::BudgetExceeded { .. } | LlmError::Upstream { .. } | LlmError::Tokenizer(_) => {
                false
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Body of one chat-completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: usize,
    pub n: u32,
    pub temperature: f32,
}

impl ChatRequest {
    fn new(tier: ModelTier, prompt: &str, max_tokens: usize) -> Self {
        Self {
            model: tier.model().to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: prompts::SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            max_tokens,
            n: 1,
            temperature: TEMPERATURE,
        }
    }
}

/// The network side of a completion. Returns the generated text of the first choice.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> Result<String, LlmError>;
}

/// A finished completion and what it cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResult {
    /// Generated text with surrounding whitespace trimmed.
    pub text: String,
    pub prompt_tokens: usize,
    pub response_tokens: usize,
    pub total_tokens: usize,
    pub cost_usd: f64,
    pub tier: ModelTier,
}

#[derive(Clone)]
pub struct LlmClient {
    backend: Arc<dyn CompletionBackend>,
    tokens: Arc<dyn TokenCounter>,
    ledger: Arc<CostLedger>,
    backoff: Duration,
}

impl LlmClient {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        tokens: Arc<dyn TokenCounter>,
        ledger: Arc<CostLedger>,
    ) -> Self {
        Self {
            backend,
            tokens,
            ledger,
            backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    /// Fixed pause between failed attempts.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn ledger(&self) -> &CostLedger {
        &self.ledger
    }

    /// Sends `prompt` to the model of `tier` and returns the trimmed reply.
    ///
    /// Fails with `BudgetExceeded` without touching the network when the prompt
    /// alone reaches `TOKEN_CEILING`, and with `Upstream` once `MAX_ATTEMPTS`
    /// retryable failures have occurred.
    pub async fn complete(&self, prompt: &str, tier: ModelTier) -> Result<CompletionResult, LlmError> {
        let prompt_tokens = self.tokens.count(prompt);
        if prompt_tokens >= TOKEN_CEILING {
            return Err(LlmError::BudgetExceeded {
                prompt_tokens,
                ceiling: TOKEN_CEILING,
            });
        }
        let available = TOKEN_CEILING - prompt_tokens;

        let request = ChatRequest::new(tier, prompt, available);
        let raw = self.send_with_retry(&request).await?;

        let text = raw.trim().to_string();
        let response_tokens = self.tokens.count(&text);
        let total_tokens = prompt_tokens + response_tokens;
        let cost_usd = tier.cost_usd(total_tokens);

        // The spend already happened; a ledger failure must not trigger another call.
        match self.ledger.record(cost_usd).await {
            Ok(running_total) => info!(
                "Completion on {} used {total_tokens} tokens (${cost_usd:.4}); total spend ${running_total:.4}",
                tier.model()
            ),
            Err(e) => error!("Failed to record ${cost_usd:.4} in cost ledger: {e}"),
        }

        Ok(CompletionResult {
            text,
            prompt_tokens,
            response_tokens,
            total_tokens,
            cost_usd,
            tier,
        })
    }

    async fn send_with_retry(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.backend.chat(request).await {
                Ok(text) => return Ok(text),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) if attempt >= MAX_ATTEMPTS => {
                    return Err(LlmError::Upstream {
                        attempts: attempt,
                        last: Box::new(e),
                    })
                }
                Err(e) => {
                    warn!(
                        "Completion attempt {attempt}/{MAX_ATTEMPTS} failed: {e}. Retrying in {}ms",
                        self.backoff.as_millis()
                    );
                    tokio::time::sleep(self.backoff).await;
                }
            }
        }
    }
}
