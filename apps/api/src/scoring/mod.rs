//! Candidate scoring — sends résumé text plus the evaluation rubric to the
//! LLM and parses the JSON verdict into a `CandidateRecord`.
//!
//! Pluggable, trait-based. `AppState` holds an `Arc<dyn CandidateScorer>`;
//! tests inject deterministic stubs.
//!
//! Fails closed: a scorer never errors outward. Any request or parse failure
//! becomes a sentinel record (score 0, name "error", error text in the
//! summary) so one bad message can never abort a scan.

pub mod prompts;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::llm_client::LlmClient;
use crate::models::candidate::{CandidateRecord, Gender};

/// Hard cap on résumé characters sent to the model. Hard truncation, not
/// summarization — bounds request cost and stays inside the context limit.
pub const MAX_RESUME_CHARS: usize = 4000;

/// The scorer trait. Implement this to swap backends without touching the
/// pipeline or handler code.
#[async_trait]
pub trait CandidateScorer: Send + Sync {
    /// One attempt per message. No retry, no backoff.
    async fn score(&self, resume_text: &str, rubric: &str) -> CandidateRecord;
}

/// Scorer backed by the shared Anthropic client.
pub struct LlmCandidateScorer {
    llm: LlmClient,
}

impl LlmCandidateScorer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl CandidateScorer for LlmCandidateScorer {
    async fn score(&self, resume_text: &str, rubric: &str) -> CandidateRecord {
        let excerpt = truncate_chars(resume_text, MAX_RESUME_CHARS);
        let prompt = prompts::build_scoring_prompt(rubric, excerpt);

        match self
            .llm
            .call_json::<RawEvaluation>(&prompt, prompts::SCORING_SYSTEM)
            .await
        {
            Ok(raw) => raw.into_record(),
            Err(err) => {
                warn!(error = %err, "candidate scoring failed");
                sentinel_record(&err.to_string())
            }
        }
    }
}

/// The model's JSON verdict, with every field optional. The response has no
/// enforced schema beyond the prompt, so nothing here is trusted: missing
/// fields get defaults and the score is clamped on conversion.
#[derive(Debug, Deserialize)]
struct RawEvaluation {
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    experience_years: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    school: Option<String>,
}

impl RawEvaluation {
    fn into_record(self) -> CandidateRecord {
        let full_name = match self.full_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => "unknown".to_string(),
        };

        CandidateRecord {
            full_name,
            score: self.score.clamp(0, 100) as u8,
            gender: self
                .gender
                .as_deref()
                .map(parse_gender)
                .unwrap_or(Gender::Unknown),
            experience_years: self.experience_years.unwrap_or_default(),
            summary: self.summary.unwrap_or_default(),
            school: self.school.unwrap_or_default(),
            // Attached by the pipeline once the record joins a result set
            email_subject: String::new(),
            email_date: String::new(),
        }
    }
}

fn parse_gender(value: &str) -> Gender {
    match value.trim().to_ascii_lowercase().as_str() {
        "female" => Gender::Female,
        "male" => Gender::Male,
        _ => Gender::Unknown,
    }
}

/// Placeholder record emitted when scoring fails.
pub fn sentinel_record(detail: &str) -> CandidateRecord {
    CandidateRecord {
        full_name: "error".to_string(),
        score: 0,
        gender: Gender::Unknown,
        experience_years: String::new(),
        summary: format!("Scoring failed: {detail}"),
        school: String::new(),
        email_subject: String::new(),
        email_date: String::new(),
    }
}

/// Truncates to at most `max_chars` characters without splitting a char.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_from(json: &str) -> RawEvaluation {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_full_verdict_parses_into_record() {
        let record = raw_from(
            r#"{
                "full_name": "Jane Doe",
                "score": 85,
                "gender": "female",
                "experience_years": "4",
                "summary": "Strong match with hands-on one-to-one experience.",
                "school": "Child Development, Example University"
            }"#,
        )
        .into_record();

        assert_eq!(record.full_name, "Jane Doe");
        assert_eq!(record.score, 85);
        assert_eq!(record.gender, Gender::Female);
        assert_eq!(record.experience_years, "4");
        assert_eq!(record.school, "Child Development, Example University");
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let record = raw_from("{}").into_record();

        assert_eq!(record.full_name, "unknown");
        assert_eq!(record.score, 0);
        assert_eq!(record.gender, Gender::Unknown);
        assert!(record.experience_years.is_empty());
        assert!(record.summary.is_empty());
    }

    #[test]
    fn test_blank_name_becomes_unknown() {
        let record = raw_from(r#"{"full_name": "   "}"#).into_record();
        assert_eq!(record.full_name, "unknown");
    }

    #[test]
    fn test_score_clamped_to_0_100() {
        assert_eq!(raw_from(r#"{"score": 150}"#).into_record().score, 100);
        assert_eq!(raw_from(r#"{"score": -20}"#).into_record().score, 0);
        assert_eq!(raw_from(r#"{"score": 100}"#).into_record().score, 100);
    }

    #[test]
    fn test_gender_parse_is_case_insensitive() {
        assert_eq!(parse_gender("FEMALE"), Gender::Female);
        assert_eq!(parse_gender(" Male "), Gender::Male);
        assert_eq!(parse_gender("nonbinary"), Gender::Unknown);
        assert_eq!(parse_gender(""), Gender::Unknown);
    }

    #[test]
    fn test_sentinel_record_shape() {
        let record = sentinel_record("connection timed out");

        assert_eq!(record.full_name, "error");
        assert_eq!(record.score, 0);
        assert!(record.summary.contains("connection timed out"));
    }

    #[test]
    fn test_truncate_respects_char_cap_on_multibyte_input() {
        let text = "é".repeat(MAX_RESUME_CHARS + 1000);
        let truncated = truncate_chars(&text, MAX_RESUME_CHARS);
        assert_eq!(truncated.chars().count(), MAX_RESUME_CHARS);
    }

    #[test]
    fn test_truncate_leaves_short_input_untouched() {
        let text = "short résumé";
        assert_eq!(truncate_chars(text, MAX_RESUME_CHARS), text);
    }
}
