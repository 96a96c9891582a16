use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Interview mode. Governs the total question count and the style of
/// generated questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewMode {
    Hr,
    Technical,
    Behavioral,
}

impl InterviewMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "hr" => Some(Self::Hr),
            "technical" => Some(Self::Technical),
            "behavioral" => Some(Self::Behavioral),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hr => "hr",
            Self::Technical => "technical",
            Self::Behavioral => "behavioral",
        }
    }

    /// Fixed session length per mode. A session is complete exactly when
    /// `answers.len()` reaches this count.
    pub fn total_questions(&self) -> usize {
        match self {
            Self::Technical => 8,
            Self::Behavioral => 5,
            Self::Hr => 6,
        }
    }
}

/// Per-turn evaluation of one answer, as returned by the model (or the
/// neutral fallback when the model call fails).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: i32,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

/// One submitted answer with its evaluation, stored in the session's
/// `answers` JSONB array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub text: String,
    pub score: i32,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub answered_at: DateTime<Utc>,
}

/// An interview-practice session. Questions and answers are ordered JSONB
/// arrays; `turn` is the optimistic-concurrency counter checked on every
/// mutation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSessionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mode: String,
    pub target_role: String,
    pub questions: Json<Vec<String>>,
    pub answers: Json<Vec<AnswerRecord>>,
    pub overall_score: Option<i32>,
    pub summary: Option<String>,
    pub turn: i32,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl InterviewSessionRow {
    pub fn mode(&self) -> InterviewMode {
        // Stored modes are validated at session start.
        InterviewMode::parse(&self.mode).unwrap_or(InterviewMode::Hr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_questions_per_mode() {
        assert_eq!(InterviewMode::Technical.total_questions(), 8);
        assert_eq!(InterviewMode::Behavioral.total_questions(), 5);
        assert_eq!(InterviewMode::Hr.total_questions(), 6);
    }

    #[test]
    fn test_mode_parse_roundtrip() {
        for mode in [
            InterviewMode::Hr,
            InterviewMode::Technical,
            InterviewMode::Behavioral,
        ] {
            assert_eq!(InterviewMode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(InterviewMode::parse("systems-design"), None);
    }

    #[test]
    fn test_answer_record_serializes_camel_case() {
        let record = AnswerRecord {
            text: "I led the migration".to_string(),
            score: 80,
            feedback: "Clear ownership".to_string(),
            strengths: vec!["specific".to_string()],
            improvements: vec!["quantify impact".to_string()],
            answered_at: Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("answeredAt").is_some());
        assert!(json.get("answered_at").is_none());
    }
}
