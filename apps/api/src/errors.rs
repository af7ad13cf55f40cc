use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::cost::LedgerError;
use crate::llm_client::LlmError;
use crate::render::RenderError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// The prompt alone already uses the whole token budget.
    #[error("Token budget exceeded: {0}")]
    BudgetExceeded(LlmError),

    #[error("LLM error: {0}")]
    Llm(LlmError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Cost ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::BudgetExceeded { .. } => AppError::BudgetExceeded(e),
            other => AppError::Llm(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::BudgetExceeded(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "TOKEN_BUDGET_EXCEEDED",
                e.to_string(),
            ),
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "The language model request failed".to_string(),
                )
            }
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RENDER_ERROR",
                    "The letter could not be written".to_string(),
                )
            }
            AppError::Ledger(e) => {
                tracing::error!("Cost ledger error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LEDGER_ERROR",
                    "The cost ledger could not be read".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_rejection_maps_to_its_own_variant() {
        let err: AppError = LlmError::BudgetExceeded {
            prompt_tokens: 4200,
            ceiling: 4000,
        }
        .into();
        assert!(matches!(err, AppError::BudgetExceeded(_)));
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::from(LlmError::EmptyContent), StatusCode::BAD_GATEWAY),
            (
                AppError::from(RenderError::Pdf("broken".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::from(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
