use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::cost::CostLedger;
use crate::layout::default_page_config;
use crate::letter::LetterService;
use crate::llm_client::{Cl100kCounter, LlmClient, OpenAiBackend};
use crate::render::PdfSink;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub letters: Arc<LetterService>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the production collaborators: OpenAI backend, cl100k token
    /// counter, file ledger and PDF sink on A4 at 11pt in the configured font.
    pub fn from_config(config: &Config) -> Result<Self> {
        let backend = OpenAiBackend::new(config.api_key()?.to_string(), config.openai_api_url.clone())
            .context("Failed to build HTTP client")?;
        let tokens = Cl100kCounter::new().context("Failed to load cl100k_base tokenizer")?;
        let ledger = CostLedger::new(config.cost_file.clone());

        let llm = LlmClient::new(Arc::new(backend), Arc::new(tokens), Arc::new(ledger))
            .with_backoff(config.retry_backoff);
        info!(
            "LLM client initialized (model: {}, ledger: {})",
            config.model_tier.model(),
            config.cost_file.display()
        );

        let page = default_page_config(config.font_family);
        info!("Layout page config: {:?} {}pt", page.font, page.font_size_pt);

        let letters = LetterService::new(
            llm,
            config.model_tier,
            config.applicant.clone(),
            page,
            config.output_dir.clone(),
            Arc::new(PdfSink),
        );

        Ok(Self {
            letters: Arc::new(letters),
            config: Arc::new(config.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_requires_api_key() {
        let config = Config::from_lookup(|_| None).unwrap();
        let err = AppState::from_config(&config).err().unwrap();
        assert!(format!("{err:#}").contains("OPENAI_API_KEY"));
    }
}
