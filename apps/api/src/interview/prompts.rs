// All LLM prompt constants for the interview module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::models::interview::InterviewMode;

/// Question-style guidance injected into opening and follow-up prompts.
pub fn mode_guidance(mode: InterviewMode) -> &'static str {
    match mode {
        InterviewMode::Technical => {
            "Ask technical questions about coding, system architecture, \
             debugging, and engineering trade-offs. Prefer questions that \
             invite the candidate to reason aloud about a concrete design."
        }
        InterviewMode::Behavioral => {
            "Ask behavioral questions answerable with the STAR method \
             (Situation, Task, Action, Result). Probe for the candidate's \
             specific role and measurable outcomes."
        }
        InterviewMode::Hr => {
            "Ask HR screening questions about motivation, cultural fit, \
             career goals, and working style. Keep the tone conversational."
        }
    }
}

/// System prompt for opening and follow-up question generation.
pub const QUESTION_SYSTEM: &str = "You are an experienced interviewer \
    conducting a mock interview. You ask exactly one question at a time. \
    You MUST respond with valid JSON only: {\"question\": \"...\"}. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Opening question prompt. Replace `{mode_guidance}` and `{target_role}`.
pub const OPENING_QUESTION_TEMPLATE: &str = r#"You are opening a mock interview for a candidate targeting the role: {target_role}.

{mode_guidance}

Ask a strong opening question appropriate for the first minutes of the interview. Return a JSON object:
{"question": "..."}"#;

/// Follow-up question prompt.
/// Replace: {mode_guidance}, {target_role}, {transcript_json}.
pub const NEXT_QUESTION_TEMPLATE: &str = r#"You are mid-way through a mock interview for a candidate targeting the role: {target_role}.

{mode_guidance}

The transcript so far, with per-answer scores (0-100):
{transcript_json}

Ask the single best next question. Build on weak areas revealed by low scores, avoid repeating topics already covered, and keep difficulty appropriate to the candidate's level so far. Return a JSON object:
{"question": "..."}"#;

/// Evaluation prompt. Replace: {target_role}, {question}, {answer}.
pub const EVALUATE_TEMPLATE: &str = r#"Evaluate this mock-interview answer from a candidate targeting the role: {target_role}.

QUESTION:
{question}

ANSWER:
{answer}

Return a JSON object with this EXACT schema (no extra fields):
{
  "score": 80,
  "feedback": "One short paragraph of direct, specific feedback.",
  "strengths": ["...", "..."],
  "improvements": ["...", "..."]
}

Rules:
- `strengths` and `improvements` each contain 2 or 3 short bullet strings.
- Judge only what the candidate actually said — do not invent context.
- An empty or off-topic answer scores below 40."#;

/// Session summary prompt.
/// Replace: {target_role}, {mode}, {overall_score}, {transcript_json}.
pub const SUMMARY_TEMPLATE: &str = r#"The candidate has finished a {mode} mock interview for the role: {target_role}. Their overall score is {overall_score}/100.

Full transcript with per-answer evaluations:
{transcript_json}

Write a free-text summary (one or two paragraphs, plain text, no markdown) covering: overall performance, their strongest patterns, the most important areas to improve, and a closing line of encouragement."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_guidance_matches_mode() {
        assert!(mode_guidance(InterviewMode::Technical).contains("architecture"));
        assert!(mode_guidance(InterviewMode::Behavioral).contains("STAR"));
        assert!(mode_guidance(InterviewMode::Hr).contains("cultural fit"));
    }

    #[test]
    fn test_templates_carry_their_placeholders() {
        assert!(OPENING_QUESTION_TEMPLATE.contains("{target_role}"));
        assert!(NEXT_QUESTION_TEMPLATE.contains("{transcript_json}"));
        assert!(EVALUATE_TEMPLATE.contains("{question}"));
        assert!(EVALUATE_TEMPLATE.contains("{answer}"));
        assert!(SUMMARY_TEMPLATE.contains("{overall_score}"));
    }
}
