//! Axum route handlers for the scan API.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::pipeline::{run_scan, ScanConfig, ScanOutcome, TracingProgress};
use crate::scoring::{prompts::DEFAULT_RUBRIC, CandidateScorer, LlmCandidateScorer};
use crate::state::AppState;

/// Bounds on the per-run fetch limit. Requests outside the range are clamped,
/// not rejected.
const LIMIT_MIN: u32 = 5;
const LIMIT_MAX: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    /// Mail account identifier.
    pub account: String,
    /// App-specific password — not the primary account password.
    pub credential: String,
    #[serde(default = "default_folder")]
    pub folder: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_newest_first")]
    pub newest_first: bool,
    /// Overrides the default evaluation rubric for this run.
    #[serde(default)]
    pub rubric: Option<String>,
    /// Overrides the server's LLM credential for this run.
    #[serde(default)]
    pub llm_api_key: Option<String>,
}

fn default_folder() -> String {
    "LSA".to_string()
}

fn default_limit() -> u32 {
    10
}

fn default_newest_first() -> bool {
    true
}

fn effective_limit(requested: u32) -> u32 {
    requested.clamp(LIMIT_MIN, LIMIT_MAX)
}

/// POST /api/v1/scan
///
/// Runs one full analysis pass over the configured folder and returns the
/// ranked result set. Progress is reported through the tracing subscriber.
pub async fn handle_scan(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> Result<Json<ScanOutcome>, AppError> {
    let config = ScanConfig {
        host: state.config.imap_host.clone(),
        port: state.config.imap_port,
        account: request.account,
        credential: request.credential,
        folder: request.folder,
        limit: effective_limit(request.limit),
        newest_first: request.newest_first,
        rubric: request
            .rubric
            .filter(|rubric| !rubric.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_RUBRIC.to_string()),
    };

    // Callers may bring their own LLM credential; otherwise use the shared scorer.
    let scorer: Arc<dyn CandidateScorer> = match request.llm_api_key {
        Some(key) if !key.trim().is_empty() => {
            Arc::new(LlmCandidateScorer::new(LlmClient::new(key)))
        }
        _ => state.scorer.clone(),
    };

    let outcome = run_scan(config, scorer.as_ref(), &TracingProgress).await?;

    Ok(Json(outcome))
}

/// GET /api/v1/rubric
///
/// Returns the default rubric so deployers can inspect what a scan will use
/// before overriding it per request.
pub async fn handle_rubric() -> Json<Value> {
    Json(json!({ "rubric": DEFAULT_RUBRIC }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_request_fills_defaults() {
        let request: ScanRequest =
            serde_json::from_str(r#"{"account": "a@b.com", "credential": "pw"}"#).unwrap();

        assert_eq!(request.folder, "LSA");
        assert_eq!(request.limit, 10);
        assert!(request.newest_first);
        assert!(request.rubric.is_none());
        assert!(request.llm_api_key.is_none());
    }

    #[test]
    fn test_effective_limit_clamps_to_bounds() {
        assert_eq!(effective_limit(3), 5);
        assert_eq!(effective_limit(10), 10);
        assert_eq!(effective_limit(99), 50);
    }
}
