pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::pipeline::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/scan", post(handlers::handle_scan))
        .route("/api/v1/rubric", get(handlers::handle_rubric))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::candidate::CandidateRecord;
    use crate::scoring::{sentinel_record, CandidateScorer};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::util::ServiceExt;

    struct NoopScorer;

    #[async_trait]
    impl CandidateScorer for NoopScorer {
        async fn score(&self, _resume_text: &str, _rubric: &str) -> CandidateRecord {
            sentinel_record("noop")
        }
    }

    fn test_state() -> AppState {
        AppState {
            config: Config {
                anthropic_api_key: "test-key".to_string(),
                imap_host: "imap.example.com".to_string(),
                imap_port: 993,
                port: 0,
                rust_log: "info".to_string(),
            },
            scorer: Arc::new(NoopScorer),
        }
    }

    #[tokio::test]
    async fn test_health_route_responds_ok() {
        let app = build_router(test_state());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rubric_route_returns_default_rubric() {
        let app = build_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/rubric")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("Learning Support Assistant"));
    }
}
