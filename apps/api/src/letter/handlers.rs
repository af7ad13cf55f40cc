//! Axum route handlers for the Letters API.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Form, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::letter::resume::load_resume;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LetterForm {
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct LetterAccepted {
    pub job_id: Uuid,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CostResponse {
    pub total_usd: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/letters
///
/// Accepts one job description and starts generating its letter in the
/// background. The response never reports the outcome; failures are logged.
/// An empty description still produces a letter, named "default".
pub async fn handle_submit(
    State(state): State<AppState>,
    Form(form): Form<LetterForm>,
) -> Result<(StatusCode, Json<LetterAccepted>), AppError> {
    if form.job_description.trim().is_empty() {
        warn!("Empty job description; the letter will be generic");
    }

    // Re-read per request so résumé edits apply without a restart.
    let resume = load_resume(&state.config.resume_path).await?;

    let job_id = Uuid::new_v4();
    info!("Accepted letter job {job_id}");
    tokio::spawn(Arc::clone(&state.letters).run_detached(job_id, form.job_description, resume));

    Ok((
        StatusCode::ACCEPTED,
        Json(LetterAccepted {
            job_id,
            message: "Job application started!".to_string(),
        }),
    ))
}

/// GET /api/v1/cost
///
/// Running total of completion spend recorded in the ledger.
pub async fn handle_cost(State(state): State<AppState>) -> Result<Json<CostResponse>, AppError> {
    let total_usd = state.letters.llm().ledger().total().await?;
    Ok(Json(CostResponse { total_usd }))
}
