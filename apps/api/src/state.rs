use std::sync::Arc;

use crate::config::Config;
use crate::scoring::CandidateScorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable scorer. Default: LlmCandidateScorer over the server API key.
    /// Handlers substitute a per-request client when the caller brings a key.
    pub scorer: Arc<dyn CandidateScorer>,
}
