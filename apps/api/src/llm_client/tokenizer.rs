//! Token counting for the prompt budget and cost accounting.

use tiktoken_rs::CoreBPE;

use crate::llm_client::LlmError;

/// Counts tokens the way the hosted model does. The same counter measures
/// prompts and responses.
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

/// `cl100k_base` byte-pair encoding, shared by the gpt-4 and gpt-3.5-turbo tiers.
pub struct Cl100kCounter {
    bpe: CoreBPE,
}

impl Cl100kCounter {
    /// Builds the encoder. This parses the whole merge table, so build it once.
    pub fn new() -> Result<Self, LlmError> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| LlmError::Tokenizer(e.to_string()))?;
        Ok(Self { bpe })
    }
}

impl TokenCounter for Cl100kCounter {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }
}
