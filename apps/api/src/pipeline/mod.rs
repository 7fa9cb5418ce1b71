//! Analysis pipeline — orchestrates one scan run.
//!
//! Flow: validate config → fetch folder → per message: extract attachments →
//! body fallback → score → attach email metadata → progress → stable sort.
//!
//! Messages are processed strictly in fetch order, one at a time. Only
//! connection, authentication, and folder-selection errors abort a run;
//! every per-message failure is absorbed into that message's own record or
//! a silent skip.

pub mod handlers;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::extract::{self, DocKind};
use crate::mail::{self, FetchRequest, MailError};
use crate::models::candidate::CandidateRecord;
use crate::models::message::FetchedMessage;
use crate::scoring::CandidateScorer;

/// Below this many characters of attachment text, the message body is pulled
/// in as a fallback source.
const BODY_FALLBACK_BELOW_CHARS: usize = 100;

/// Messages whose final text is not longer than this are skipped outright —
/// there is nothing meaningful to score.
const MIN_SCOREABLE_CHARS: usize = 50;

/// Everything one run needs. Credentials arrive per request and die with it.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub host: String,
    pub port: u16,
    pub account: String,
    pub credential: String,
    pub folder: String,
    pub limit: u32,
    pub newest_first: bool,
    pub rubric: String,
}

impl ScanConfig {
    /// Checks that every required setting is present, naming all missing
    /// fields at once. Runs before any network call.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let mut missing = Vec::new();
        if self.host.trim().is_empty() {
            missing.push("host".to_string());
        }
        if self.account.trim().is_empty() {
            missing.push("account".to_string());
        }
        if self.credential.trim().is_empty() {
            missing.push("credential".to_string());
        }
        if self.folder.trim().is_empty() {
            missing.push("folder".to_string());
        }
        if self.rubric.trim().is_empty() {
            missing.push("rubric".to_string());
        }
        if self.limit == 0 {
            missing.push("limit".to_string());
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::Configuration { missing })
        }
    }

    fn fetch_request(&self) -> FetchRequest {
        FetchRequest {
            host: self.host.clone(),
            port: self.port,
            account: self.account.clone(),
            credential: self.credential.clone(),
            folder: self.folder.clone(),
            limit: self.limit,
            newest_first: self.newest_first,
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("missing required configuration: {}", missing.join(", "))]
    Configuration { missing: Vec<String> },

    #[error(transparent)]
    Mail(#[from] MailError),

    #[error("scan task failed: {0}")]
    Internal(String),
}

/// Receives (processed, total) after each message. Keeps the pipeline core
/// free of any rendering dependency.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, processed: usize, total: usize);
}

/// Progress sink that reports through the tracing subscriber.
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn on_progress(&self, processed: usize, total: usize) {
        info!("analyzed {processed}/{total} messages");
    }
}

/// The ranked result of one scan run.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ScanOutcome {
    /// Messages fetched from the folder.
    pub scanned: usize,
    /// Messages with too little text to score.
    pub skipped: usize,
    /// Best candidate, if any were scored.
    pub top: Option<TopCandidate>,
    /// Human-readable note when there is nothing to rank.
    pub message: Option<String>,
    /// Sorted by score descending; ties keep fetch order.
    pub candidates: Vec<CandidateRecord>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TopCandidate {
    pub full_name: String,
    pub score: u8,
}

/// Runs one full scan: fetch, analyze, rank.
pub async fn run_scan(
    config: ScanConfig,
    scorer: &dyn CandidateScorer,
    progress: &dyn ProgressSink,
) -> Result<ScanOutcome, PipelineError> {
    config.validate()?;

    info!(folder = %config.folder, limit = config.limit, "starting mailbox scan");

    // The IMAP client is blocking I/O; keep it off the async workers.
    let request = config.fetch_request();
    let messages = tokio::task::spawn_blocking(move || mail::fetch_folder(&request))
        .await
        .map_err(|e| PipelineError::Internal(e.to_string()))??;

    let scanned = messages.len();
    let (candidates, skipped) = analyze_messages(&messages, &config.rubric, scorer, progress).await;

    Ok(assemble_outcome(&config.folder, scanned, skipped, candidates))
}

/// The per-message loop, separated from the scan so tests can drive it with
/// fixture messages and a stub scorer.
async fn analyze_messages(
    messages: &[FetchedMessage],
    rubric: &str,
    scorer: &dyn CandidateScorer,
    progress: &dyn ProgressSink,
) -> (Vec<CandidateRecord>, usize) {
    let total = messages.len();
    let mut candidates = Vec::new();
    let mut skipped = 0usize;

    for (index, message) in messages.iter().enumerate() {
        debug!(subject = %message.subject, "analyzing message {}/{}", index + 1, total);

        let text = gather_resume_text(message);
        if text.chars().count() > MIN_SCOREABLE_CHARS {
            let mut record = scorer.score(&text, rubric).await;
            record.email_subject = message.subject.clone();
            record.email_date = message.date.clone();
            candidates.push(record);
        } else {
            skipped += 1;
            debug!(subject = %message.subject, "skipped: not enough text to score");
        }

        progress.on_progress(index + 1, total);
    }

    (candidates, skipped)
}

/// Concatenates extracted text from all PDF/DOCX attachments in attachment
/// order, then falls back to the plain-text body (HTML source if no plain
/// text) when the attachments yielded too little.
fn gather_resume_text(message: &FetchedMessage) -> String {
    let mut text = String::new();

    for attachment in &message.attachments {
        let Some(kind) = DocKind::from_filename(&attachment.filename) else {
            continue;
        };
        match extract::extract(&attachment.payload, kind) {
            Ok(extracted) => text.push_str(&extracted),
            Err(err) => {
                warn!(filename = %attachment.filename, error = %err, "attachment extraction failed");
            }
        }
    }

    if text.chars().count() < BODY_FALLBACK_BELOW_CHARS {
        if let Some(body) = message
            .body_text
            .as_deref()
            .or(message.body_html.as_deref())
        {
            text.push('\n');
            text.push_str(body);
        }
    }

    text
}

fn assemble_outcome(
    folder: &str,
    scanned: usize,
    skipped: usize,
    mut candidates: Vec<CandidateRecord>,
) -> ScanOutcome {
    // Stable sort on score only, so equal scores keep fetch order.
    candidates.sort_by(|a, b| b.score.cmp(&a.score));

    let top = candidates.first().map(|best| TopCandidate {
        full_name: best.full_name.clone(),
        score: best.score,
    });

    let message = if scanned == 0 {
        Some(format!("No messages found in folder '{folder}'."))
    } else if candidates.is_empty() {
        Some("Messages were scanned but no scoreable resume content was found.".to_string())
    } else {
        None
    };

    ScanOutcome {
        scanned,
        skipped,
        top,
        message,
        candidates,
    }
}
