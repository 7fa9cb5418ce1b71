// All LLM prompt constants for candidate scoring.

/// System prompt — fixes the assistant role and enforces JSON-only output.
pub const SCORING_SYSTEM: &str = "You are an expert recruiting assistant evaluating résumés. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Default evaluation rubric for the Learning Support Assistant role.
///
/// Business criteria (including the employer's stated gender preference)
/// live here as plain text and nowhere else — deployers adjust or remove
/// them by overriding the `rubric` field on a scan request. No code path
/// branches on any of these criteria.
pub const DEFAULT_RUBRIC: &str = r#"Review the candidate below for a Learning Support Assistant (LSA) position.

EVALUATION CRITERIA (heaviest first):
1. Special-needs / LSA experience: is it present, and for how many years? This is the most important criterion.
2. Education: a degree in a related field (psychology, child development, counseling, special education).
3. Gender: the employer prefers a FEMALE candidate for this in-home support role. Fold this into the numeric score.
4. Similar assignments: prior shadow teaching or in-home learning support.

A female candidate with a relevant degree and hands-on experience should score 90 or above."#;

/// Scoring prompt template. Replace `{rubric}` and `{resume_text}` before sending.
pub const SCORING_PROMPT_TEMPLATE: &str = r#"{rubric}

Return a JSON object with this EXACT schema (no extra fields):
{
  "full_name": "The candidate's name ('unknown' if you cannot find one)",
  "score": 0,
  "gender": "female | male | unknown",
  "experience_years": "estimated years of relevant experience, free-form",
  "summary": "One short, direct assessment sentence about the candidate.",
  "school": "school / department the candidate graduated from"
}

"score" is an integer between 0 and 100.

RESUME TEXT TO REVIEW:
{resume_text}"#;

/// Builds the user prompt from the rubric and the (already truncated) résumé text.
pub fn build_scoring_prompt(rubric: &str, resume_text: &str) -> String {
    SCORING_PROMPT_TEMPLATE
        .replace("{rubric}", rubric)
        .replace("{resume_text}", resume_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rubric_names_every_criterion() {
        let rubric = DEFAULT_RUBRIC.to_lowercase();
        assert!(rubric.contains("special-needs"));
        assert!(rubric.contains("psychology"));
        assert!(rubric.contains("female"));
        assert!(rubric.contains("shadow teaching"));
    }

    #[test]
    fn test_build_prompt_fills_both_placeholders() {
        let prompt = build_scoring_prompt("RUBRIC GOES HERE", "resume body");

        assert!(prompt.contains("RUBRIC GOES HERE"));
        assert!(prompt.contains("resume body"));
        assert!(!prompt.contains("{rubric}"));
        assert!(!prompt.contains("{resume_text}"));
    }

    #[test]
    fn test_prompt_pins_the_output_schema() {
        let prompt = build_scoring_prompt(DEFAULT_RUBRIC, "text");
        assert!(prompt.contains("\"full_name\""));
        assert!(prompt.contains("integer between 0 and 100"));
    }
}
