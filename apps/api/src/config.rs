use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::cost::ModelTier;
use crate::layout::FontFamily;
use crate::letter::letterhead::parse_address;
use crate::letter::ApplicantProfile;
use crate::llm_client::openai::DEFAULT_API_URL;

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable is malformed. The API key is only required
/// by commands that call the model; see `api_key`.
#[derive(Debug, Clone)]
pub struct Config {
    openai_api_key: Option<String>,
    pub openai_api_url: String,
    pub resume_path: PathBuf,
    pub output_dir: PathBuf,
    pub cost_file: PathBuf,
    pub model_tier: ModelTier,
    pub font_family: FontFamily,
    pub applicant: ApplicantProfile,
    pub retry_backoff: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let model_tier = var("MODEL_TIER", "high")
            .parse::<ModelTier>()
            .map_err(|e| anyhow!(e))
            .context("MODEL_TIER must be 'high' or 'standard'")?;

        let font_family = var("FONT_FAMILY", "times")
            .parse::<FontFamily>()
            .map_err(|e| anyhow!(e))
            .context("FONT_FAMILY must be 'times', 'helvetica' or 'courier'")?;

        let retry_backoff_ms = var("RETRY_BACKOFF_MS", "1000")
            .parse::<u64>()
            .context("RETRY_BACKOFF_MS must be a whole number of milliseconds")?;

        let date = lookup("LETTER_DATE")
            .unwrap_or_else(|| chrono::Local::now().format("%B %-d, %Y").to_string());

        Ok(Config {
            openai_api_key: lookup("OPENAI_API_KEY").filter(|key| !key.trim().is_empty()),
            openai_api_url: var("OPENAI_API_URL", DEFAULT_API_URL),
            resume_path: var("RESUME_PATH", "textResume.txt").into(),
            output_dir: var("OUTPUT_DIR", "cover letters").into(),
            cost_file: var("COST_FILE", "costTracking.txt").into(),
            model_tier,
            font_family,
            applicant: ApplicantProfile {
                name: var("APPLICANT_NAME", "Applicant"),
                address_lines: parse_address(&var("APPLICANT_ADDRESS", "")),
                date,
            },
            retry_backoff: Duration::from_millis(retry_backoff_ms),
            port: var("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG", "info"),
        })
    }

    pub fn api_key(&self) -> Result<&str> {
        self.openai_api_key
            .as_deref()
            .context("Required environment variable 'OPENAI_API_KEY' is not set")
    }
}
