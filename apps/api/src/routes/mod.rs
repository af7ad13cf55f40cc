pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::letter::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/letters", post(handlers::handle_submit))
        .route("/api/v1/cost", get(handlers::handle_cost))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, Response, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::cost::{CostLedger, ModelTier};
    use crate::layout::{default_page_config, FontFamily};
    use crate::letter::LetterService;
    use crate::llm_client::testing::{client, ScriptedBackend};
    use crate::render::testing::RecordingSink;

    const LETTER: &str = "Dear Hiring Manager,\n\nI would be glad to join.\n\nSincerely,\nMe";

    fn test_state(dir: &Path, sink: Arc<RecordingSink>) -> AppState {
        let resume = dir.join("textResume.txt");
        std::fs::write(&resume, "Ten years of Rust.").unwrap();

        let config = Config::from_lookup(|key| match key {
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            "RESUME_PATH" => Some(resume.display().to_string()),
            "LETTER_DATE" => Some("June 19, 2023".to_string()),
            _ => None,
        })
        .unwrap();

        let ledger = Arc::new(CostLedger::new(dir.join("costTracking.txt")));
        let llm = client(Arc::new(ScriptedBackend::replying(LETTER)), ledger);
        let letters = LetterService::new(
            llm,
            ModelTier::High,
            config.applicant.clone(),
            default_page_config(FontFamily::Times),
            dir.join("cover letters"),
            sink,
        );

        AppState {
            letters: Arc::new(letters),
            config: Arc::new(config),
        }
    }

    fn submit(job_description: &str) -> Request<Body> {
        let body = format!("job_description={}", job_description.replace(' ', "+"));
        Request::builder()
            .method("POST")
            .uri("/api/v1/letters")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn response_json(response: Response<Body>) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path(), Arc::new(RecordingSink::default())));

        let response = app.oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "coverletter");
    }

    async fn wait_for_render(sink: &RecordingSink) -> Vec<(std::path::PathBuf, crate::letter::LetterDocument)> {
        let mut waited = Duration::ZERO;
        while sink.rendered().is_empty() && waited < Duration::from_secs(5) {
            tokio::time::sleep(Duration::from_millis(20)).await;
            waited += Duration::from_millis(20);
        }
        sink.rendered()
    }

    #[tokio::test]
    async fn test_empty_job_description_yields_default_letter() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(RecordingSink::default());
        let app = build_router(test_state(dir.path(), sink.clone()));

        let response = app.oneshot(submit("   ")).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let rendered = wait_for_render(&sink).await;
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].0.file_name().unwrap(), "default.pdf");
    }

    #[tokio::test]
    async fn test_submit_accepts_and_renders_in_background() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(RecordingSink::default());
        let app = build_router(test_state(dir.path(), sink.clone()));

        let response = app
            .oneshot(submit("Join us for the Platform Engineer position"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let body = response_json(response).await;
        assert_eq!(body["message"], "Job application started!");
        assert!(body["job_id"].as_str().is_some());

        let rendered = wait_for_render(&sink).await;
        assert_eq!(rendered.len(), 1);
        assert_eq!(
            rendered[0].0,
            dir.path().join("cover letters").join("Platform Engineer.pdf")
        );
    }

    #[tokio::test]
    async fn test_missing_resume_fails_request() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path(), Arc::new(RecordingSink::default()));
        std::fs::remove_file(&state.config.resume_path).unwrap();

        let response = build_router(state).oneshot(submit("any job")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_cost_endpoint_reports_ledger_total() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("costTracking.txt"), "0.42").unwrap();
        let app = build_router(test_state(dir.path(), Arc::new(RecordingSink::default())));

        let response = app.oneshot(get_request("/api/v1/cost")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert!((body["total_usd"].as_f64().unwrap() - 0.42).abs() < 1e-9);
    }
}
