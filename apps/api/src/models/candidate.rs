use serde::{Deserialize, Serialize};

/// Gender as reported by the scoring model. Never inferred by code —
/// the value comes straight out of the LLM response, defaulting to Unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    #[default]
    Unknown,
}

/// A scored applicant. Produced once per analyzed message, immutable after
/// the pipeline attaches the source email metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// "unknown" when the model cannot find a name, "error" on a sentinel.
    pub full_name: String,
    /// 0–100, clamped on parse.
    pub score: u8,
    pub gender: Gender,
    /// Free-form estimate, e.g. "3" or "about 5 years".
    pub experience_years: String,
    pub summary: String,
    pub school: String,
    /// Subject of the email the résumé came from. Set by the pipeline.
    pub email_subject: String,
    /// Date of that email, `YYYY-MM-DD`. Set by the pipeline.
    pub email_date: String,
}
