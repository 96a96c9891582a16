//! Canned content substituted when the generative model is unavailable.
//!
//! A turn never aborts on a provider outage: evaluation, summary, and
//! next-question generation each degrade to the static content below. Every
//! substitution is logged by the engine so failure rates stay observable.

use crate::models::interview::{Evaluation, InterviewMode};

/// Neutral evaluation used when the evaluation call fails.
pub fn neutral_evaluation() -> Evaluation {
    Evaluation {
        score: 75,
        feedback: "Good answer. You addressed the question directly; adding a \
                   concrete example with a measurable outcome would make it stronger."
            .to_string(),
        strengths: vec![
            "Clear and direct communication".to_string(),
            "Stayed relevant to the question".to_string(),
        ],
        improvements: vec![
            "Support your points with a specific example".to_string(),
            "Quantify the outcome where possible".to_string(),
        ],
    }
}

/// Templated session summary used when the summary call fails.
pub fn fallback_summary(mode: InterviewMode, overall_score: i32) -> String {
    format!(
        "You completed the {} interview with an overall score of {}/100. \
         You communicated clearly and engaged with every question. To improve, \
         practice structuring answers around concrete situations and measurable \
         results, and review the per-question feedback above. Keep practicing — \
         consistency is what turns good answers into great ones.",
        mode.as_str(),
        overall_score
    )
}

const HR_QUESTIONS: &[&str] = &[
    "Tell me about yourself and what draws you to this role.",
    "Why are you looking to leave your current position?",
    "What kind of team culture helps you do your best work?",
    "Where do you see yourself in three to five years?",
    "Tell me about a time you disagreed with a company decision. How did you handle it?",
    "What are your salary expectations for this role?",
];

const TECHNICAL_QUESTIONS: &[&str] = &[
    "Walk me through the architecture of the most complex system you have built.",
    "How would you design a rate limiter for a public API?",
    "Describe a production incident you debugged. What was the root cause?",
    "How do you decide between SQL and NoSQL storage for a new feature?",
    "Explain a time you improved the performance of a slow endpoint or query.",
    "How would you roll out a breaking schema change with zero downtime?",
    "What trade-offs do you weigh when introducing caching?",
    "How do you approach testing a service that depends on third-party APIs?",
];

const BEHAVIORAL_QUESTIONS: &[&str] = &[
    "Tell me about a time you had to deliver under a tight deadline. What was the situation and the result?",
    "Describe a conflict with a teammate and how you resolved it.",
    "Tell me about a project that failed. What did you learn?",
    "Describe a time you had to influence a decision without authority.",
    "Tell me about the accomplishment you are proudest of and your specific role in it.",
];

/// Static question bank used when next-question generation fails.
/// Indexed by `question_index % len` so a full session never repeats
/// adjacent questions even on total provider outage.
pub fn fallback_question(mode: InterviewMode, question_index: usize) -> &'static str {
    let bank = match mode {
        InterviewMode::Hr => HR_QUESTIONS,
        InterviewMode::Technical => TECHNICAL_QUESTIONS,
        InterviewMode::Behavioral => BEHAVIORAL_QUESTIONS,
    };
    bank[question_index % bank.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_evaluation_shape() {
        let eval = neutral_evaluation();
        assert_eq!(eval.score, 75);
        assert!(eval.feedback.starts_with("Good answer"));
        assert_eq!(eval.strengths.len(), 2);
        assert_eq!(eval.improvements.len(), 2);
    }

    #[test]
    fn test_fallback_summary_interpolates_score_and_mode() {
        let summary = fallback_summary(InterviewMode::Technical, 82);
        assert!(summary.contains("technical"));
        assert!(summary.contains("82/100"));
    }

    #[test]
    fn test_fallback_question_wraps_around() {
        let first = fallback_question(InterviewMode::Behavioral, 0);
        let wrapped = fallback_question(InterviewMode::Behavioral, BEHAVIORAL_QUESTIONS.len());
        assert_eq!(first, wrapped);
    }

    #[test]
    fn test_bank_covers_full_session_per_mode() {
        // Each bank holds at least as many questions as a session needs,
        // so a fully-degraded session never truncates.
        assert!(HR_QUESTIONS.len() >= InterviewMode::Hr.total_questions());
        assert!(TECHNICAL_QUESTIONS.len() >= InterviewMode::Technical.total_questions());
        assert!(BEHAVIORAL_QUESTIONS.len() >= InterviewMode::Behavioral.total_questions());
    }
}
