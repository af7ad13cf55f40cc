//! Cover letter generation: one letter from job description to file.
//!
//! Flow: build_prompt → LlmClient::complete → build_letter (salutation break,
//!       body extraction, letterhead, wrap) → write_letter on the blocking pool.
//!
//! Every job description is handled independently; nothing is shared between
//! concurrent jobs except the cost ledger and the output directory.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::cost::ModelTier;
use crate::errors::AppError;
use crate::layout::{normalize_text, paginate, wrap_for_page, PageConfig, Paragraph};
use crate::letter::extract::{break_after_salutation, position_name, reshape_body};
use crate::letter::letterhead::ApplicantProfile;
use crate::letter::prompts::build_prompt;
use crate::llm_client::{CompletionResult, LlmClient};
use crate::render::{write_letter, DocumentSink};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// A letter laid out into lines, ready for a sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterDocument {
    /// Output file stem: the position parsed from the job description, or "default".
    pub position: String,
    pub paragraphs: Vec<Paragraph>,
    /// False when the salutation/closing structure was not found and the
    /// completion text was used as returned.
    pub format_matched: bool,
}

impl LetterDocument {
    pub fn pages(&self, page: &PageConfig) -> Vec<Vec<Paragraph>> {
        paginate(&self.paragraphs, page.lines_per_page())
    }

    /// The line texts, blanks omitted.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.paragraphs.iter().filter_map(Paragraph::text)
    }
}

/// Outcome of a successful generation.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedLetter {
    pub path: PathBuf,
    pub cost_usd: f64,
    pub format_matched: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Formatting
// ────────────────────────────────────────────────────────────────────────────

/// Turns a completion into a laid-out letter.
///
/// The salutation gets its own line, the body is cut from the salutation to
/// the closing and signed, the letterhead goes on top, and the whole text is
/// wrapped to the page. A missing salutation/closing is logged and the
/// completion text is kept as returned.
pub fn build_letter(
    job_description: &str,
    completion: &CompletionResult,
    profile: &ApplicantProfile,
    page: &PageConfig,
) -> LetterDocument {
    let text = break_after_salutation(&completion.text);

    let (body, format_matched) = match reshape_body(&text, &profile.name) {
        Ok(body) => (body, true),
        Err(e) => {
            warn!("Letter format mismatch: {e}. Check the text; using it as returned");
            (text, false)
        }
    };

    let full_text = normalize_text(&format!("{}{}", profile.letterhead(), body));

    LetterDocument {
        position: position_name(job_description),
        paragraphs: wrap_for_page(&full_text, page),
        format_matched,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Service
// ────────────────────────────────────────────────────────────────────────────

pub struct LetterService {
    llm: LlmClient,
    tier: ModelTier,
    profile: ApplicantProfile,
    page: PageConfig,
    output_dir: PathBuf,
    sink: Arc<dyn DocumentSink>,
}

impl LetterService {
    pub fn new(
        llm: LlmClient,
        tier: ModelTier,
        profile: ApplicantProfile,
        page: PageConfig,
        output_dir: PathBuf,
        sink: Arc<dyn DocumentSink>,
    ) -> Self {
        Self {
            llm,
            tier,
            profile,
            page,
            output_dir,
            sink,
        }
    }

    pub fn llm(&self) -> &LlmClient {
        &self.llm
    }

    /// Generates one letter and writes it under the output directory.
    pub async fn generate(&self, job_description: &str, resume: &str) -> Result<GeneratedLetter, AppError> {
        let prompt = build_prompt(resume, job_description);
        let completion = self.llm.complete(&prompt, self.tier).await?;
        debug!(
            "Completion on {} tier: {} prompt + {} response tokens",
            completion.tier, completion.prompt_tokens, completion.response_tokens
        );

        let letter = build_letter(job_description, &completion, &self.profile, &self.page);
        info!(
            "Laid out letter for '{}': {} lines of text, {} page(s)",
            letter.position,
            letter.lines().count(),
            letter.pages(&self.page).len()
        );
        let format_matched = letter.format_matched;

        let sink = Arc::clone(&self.sink);
        let page = self.page.clone();
        let output_dir = self.output_dir.clone();
        let path = tokio::task::spawn_blocking(move || write_letter(sink.as_ref(), &letter, &page, &output_dir))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("render task failed: {e}")))??;

        info!("Cover letter written to {}", path.display());
        Ok(GeneratedLetter {
            path,
            cost_usd: completion.cost_usd,
            format_matched,
        })
    }

    /// Runs a job nobody waits on. Failures are logged and the job is dropped;
    /// other jobs are unaffected.
    pub async fn run_detached(self: Arc<Self>, job_id: Uuid, job_description: String, resume: String) {
        let span = info_span!("letter_job", %job_id);
        async move {
            info!("Received job description ({} bytes)", job_description.len());
            match self.generate(&job_description, &resume).await {
                Ok(letter) => info!("Completed: {}", letter.path.display()),
                Err(e) => error!("Error occurred when creating cover letter: {e}"),
            }
        }
        .instrument(span)
        .await
    }
}
