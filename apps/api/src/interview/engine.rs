//! Interview session state machine.
//!
//! A session moves awaiting-answer → evaluating → awaiting-answer until the
//! mode's fixed question count is reached, then completes. Every external
//! failure during a turn degrades to canned content (see `fallback`) — a
//! turn never aborts because the provider is down. Each substitution is
//! logged with the session id and stage so fallback rates can be monitored.
//!
//! This module mutates the in-memory session only; handlers persist the
//! result under the optimistic `turn` check.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::errors::AppError;
use crate::interview::fallback::{fallback_question, fallback_summary, neutral_evaluation};
use crate::interview::model::{InterviewModel, TranscriptEntry};
use crate::models::interview::{AnswerRecord, Evaluation, InterviewMode, InterviewSessionRow};

/// Sentinel used when the answer count has run ahead of the question list.
/// The lists should never desynchronize; if they do, the turn still proceeds
/// and the mismatch is logged.
const UNKNOWN_QUESTION: &str = "Unknown question";

/// Result of one `advance` call.
#[derive(Debug)]
pub struct TurnReport {
    pub evaluation: Evaluation,
    pub outcome: TurnOutcome,
}

#[derive(Debug)]
pub enum TurnOutcome {
    Continue {
        next_question: String,
        /// 1-based number of the question just issued.
        question_number: usize,
        total_questions: usize,
    },
    Complete {
        overall_score: i32,
        summary: String,
        total_questions: usize,
    },
}

/// Generates the opening question for a new session, degrading to the static
/// bank when the model is unavailable.
pub async fn open_session(
    model: &dyn InterviewModel,
    mode: InterviewMode,
    target_role: &str,
) -> String {
    match model.opening_question(mode, target_role).await {
        Ok(question) => question,
        Err(e) => {
            warn!(
                mode = mode.as_str(),
                stage = "opening_question",
                "Model call failed, substituting canned question: {e}"
            );
            fallback_question(mode, 0).to_string()
        }
    }
}

/// Applies one answer to the session: evaluate, append, and either issue the
/// next question or finalize the session. The caller persists the mutated
/// session afterwards.
pub async fn advance(
    model: &dyn InterviewModel,
    session: &mut InterviewSessionRow,
    answer_text: &str,
    now: DateTime<Utc>,
) -> Result<TurnReport, AppError> {
    let mode = session.mode();
    let total = mode.total_questions();
    let current_index = session.answers.0.len();

    if current_index >= total {
        return Err(AppError::Conflict(
            "Session is already complete".to_string(),
        ));
    }

    let question = match session.questions.0.get(current_index) {
        Some(q) => q.clone(),
        None => {
            warn!(
                session_id = %session.id,
                index = current_index,
                "Question list is behind the answer count; using sentinel"
            );
            UNKNOWN_QUESTION.to_string()
        }
    };

    let mut evaluation = match model
        .evaluate_answer(&session.target_role, &question, answer_text)
        .await
    {
        Ok(eval) => eval,
        Err(e) => {
            warn!(
                session_id = %session.id,
                stage = "evaluation",
                "Model call failed, substituting neutral fallback: {e}"
            );
            neutral_evaluation()
        }
    };
    evaluation.score = evaluation.score.clamp(0, 100);

    session.answers.0.push(AnswerRecord {
        text: answer_text.to_string(),
        score: evaluation.score,
        feedback: evaluation.feedback.clone(),
        strengths: evaluation.strengths.clone(),
        improvements: evaluation.improvements.clone(),
        answered_at: now,
    });

    let is_complete = current_index >= total - 1;

    if is_complete {
        let overall_score = mean_score(&session.answers.0);
        let summary = match model
            .summarize(mode, &session.target_role, overall_score, &transcript(session))
            .await
        {
            Ok(s) => s,
            Err(e) => {
                warn!(
                    session_id = %session.id,
                    stage = "summary",
                    "Model call failed, substituting templated summary: {e}"
                );
                fallback_summary(mode, overall_score)
            }
        };

        session.overall_score = Some(overall_score);
        session.summary = Some(summary.clone());
        session.completed_at = Some(now);

        return Ok(TurnReport {
            evaluation,
            outcome: TurnOutcome::Complete {
                overall_score,
                summary,
                total_questions: total,
            },
        });
    }

    let next_index = session.questions.0.len();
    let next_question = match model
        .next_question(mode, &session.target_role, &transcript(session))
        .await
    {
        Ok(q) => q,
        Err(e) => {
            warn!(
                session_id = %session.id,
                stage = "next_question",
                "Model call failed, substituting canned question: {e}"
            );
            fallback_question(mode, next_index).to_string()
        }
    };

    session.questions.0.push(next_question.clone());

    Ok(TurnReport {
        evaluation,
        outcome: TurnOutcome::Continue {
            next_question,
            question_number: session.questions.0.len(),
            total_questions: total,
        },
    })
}

/// Arithmetic mean of per-answer scores, rounded to the nearest integer.
pub fn mean_score(answers: &[AnswerRecord]) -> i32 {
    if answers.is_empty() {
        return 0;
    }
    let sum: i64 = answers.iter().map(|a| a.score as i64).sum();
    (sum as f64 / answers.len() as f64).round() as i32
}

/// Question/answer pairs for the turns answered so far.
fn transcript(session: &InterviewSessionRow) -> Vec<TranscriptEntry> {
    session
        .answers
        .0
        .iter()
        .enumerate()
        .map(|(i, answer)| TranscriptEntry {
            question: session
                .questions
                .0
                .get(i)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_QUESTION.to_string()),
            answer: answer.text.clone(),
            score: answer.score,
            feedback: answer.feedback.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sqlx::types::Json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use uuid::Uuid;

    /// Scriptable stand-in for the generative model. Each `fail_*` flag makes
    /// the corresponding call error; `scores` are consumed per evaluation.
    #[derive(Default)]
    struct StubModel {
        scores: Mutex<VecDeque<i32>>,
        fail_opening: bool,
        fail_evaluate: bool,
        fail_next: bool,
        fail_summary: bool,
        last_evaluated_question: Mutex<Option<String>>,
    }

    impl StubModel {
        fn with_scores(scores: &[i32]) -> Self {
            Self {
                scores: Mutex::new(scores.iter().copied().collect()),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl InterviewModel for StubModel {
        async fn opening_question(
            &self,
            _mode: InterviewMode,
            _target_role: &str,
        ) -> Result<String, AppError> {
            if self.fail_opening {
                return Err(AppError::Llm("stub outage".to_string()));
            }
            Ok("Opening question?".to_string())
        }

        async fn evaluate_answer(
            &self,
            _target_role: &str,
            question: &str,
            _answer: &str,
        ) -> Result<Evaluation, AppError> {
            *self.last_evaluated_question.lock().unwrap() = Some(question.to_string());
            if self.fail_evaluate {
                return Err(AppError::Llm("stub outage".to_string()));
            }
            let score = self.scores.lock().unwrap().pop_front().unwrap_or(80);
            Ok(Evaluation {
                score,
                feedback: "Solid answer.".to_string(),
                strengths: vec!["specific".to_string(), "structured".to_string()],
                improvements: vec!["quantify".to_string(), "tighten".to_string()],
            })
        }

        async fn next_question(
            &self,
            _mode: InterviewMode,
            _target_role: &str,
            transcript: &[TranscriptEntry],
        ) -> Result<String, AppError> {
            if self.fail_next {
                return Err(AppError::Llm("stub outage".to_string()));
            }
            Ok(format!("Follow-up question {}?", transcript.len() + 1))
        }

        async fn summarize(
            &self,
            _mode: InterviewMode,
            _target_role: &str,
            _overall_score: i32,
            _transcript: &[TranscriptEntry],
        ) -> Result<String, AppError> {
            if self.fail_summary {
                return Err(AppError::Llm("stub outage".to_string()));
            }
            Ok("Strong session overall.".to_string())
        }
    }

    fn new_session(mode: InterviewMode) -> InterviewSessionRow {
        InterviewSessionRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            mode: mode.as_str().to_string(),
            target_role: "Backend Engineer".to_string(),
            questions: Json(vec!["Opening question?".to_string()]),
            answers: Json(vec![]),
            overall_score: None,
            summary: None,
            turn: 0,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    #[test]
    fn test_mean_score_rounds_to_nearest() {
        let answers: Vec<AnswerRecord> = [80, 70, 90]
            .iter()
            .map(|&score| AnswerRecord {
                text: String::new(),
                score,
                feedback: String::new(),
                strengths: vec![],
                improvements: vec![],
                answered_at: Utc::now(),
            })
            .collect();
        assert_eq!(mean_score(&answers), 80);

        let answers: Vec<AnswerRecord> = [81, 82, 82, 82, 82]
            .iter()
            .map(|&score| AnswerRecord {
                text: String::new(),
                score,
                feedback: String::new(),
                strengths: vec![],
                improvements: vec![],
                answered_at: Utc::now(),
            })
            .collect();
        // 409 / 5 = 81.8 → 82
        assert_eq!(mean_score(&answers), 82);
    }

    #[tokio::test]
    async fn test_session_completes_exactly_at_mode_total() {
        let model = StubModel::default();
        let mut session = new_session(InterviewMode::Behavioral);
        let total = InterviewMode::Behavioral.total_questions();

        for i in 0..total {
            let report = advance(&model, &mut session, "My answer.", Utc::now())
                .await
                .unwrap();

            // Invariant: answers never outnumber questions.
            assert!(session.answers.0.len() <= session.questions.0.len());

            if i < total - 1 {
                assert!(matches!(report.outcome, TurnOutcome::Continue { .. }));
                assert!(session.completed_at.is_none());
            } else {
                match report.outcome {
                    TurnOutcome::Complete {
                        overall_score,
                        total_questions,
                        ..
                    } => {
                        assert_eq!(total_questions, total);
                        assert_eq!(overall_score, 80);
                    }
                    other => panic!("expected completion, got {other:?}"),
                }
                assert!(session.completed_at.is_some());
            }
        }

        assert_eq!(session.answers.0.len(), total);
        assert_eq!(session.overall_score, Some(80));
    }

    #[tokio::test]
    async fn test_overall_score_is_rounded_mean_of_answers() {
        let model = StubModel::with_scores(&[80, 70, 90, 60, 75]);
        let mut session = new_session(InterviewMode::Behavioral);

        for _ in 0..5 {
            advance(&model, &mut session, "My answer.", Utc::now())
                .await
                .unwrap();
        }

        // (80 + 70 + 90 + 60 + 75) / 5 = 75
        assert_eq!(session.overall_score, Some(75));
    }

    #[tokio::test]
    async fn test_evaluation_outage_substitutes_neutral_fallback() {
        let model = StubModel {
            fail_evaluate: true,
            ..Default::default()
        };
        let mut session = new_session(InterviewMode::Hr);

        let report = advance(&model, &mut session, "My answer.", Utc::now())
            .await
            .unwrap();

        assert_eq!(report.evaluation.score, 75);
        assert!(report.evaluation.feedback.starts_with("Good answer"));
        assert!(!report.evaluation.strengths.is_empty());
        assert_eq!(session.answers.0[0].score, 75);
        // The turn still progressed normally.
        assert!(matches!(report.outcome, TurnOutcome::Continue { .. }));
    }

    #[tokio::test]
    async fn test_next_question_outage_substitutes_bank_question() {
        let model = StubModel {
            fail_next: true,
            ..Default::default()
        };
        let mut session = new_session(InterviewMode::Technical);

        let report = advance(&model, &mut session, "My answer.", Utc::now())
            .await
            .unwrap();

        match report.outcome {
            TurnOutcome::Continue {
                next_question,
                question_number,
                total_questions,
            } => {
                assert_eq!(next_question, fallback_question(InterviewMode::Technical, 1));
                assert_eq!(question_number, 2);
                assert_eq!(total_questions, 8);
            }
            other => panic!("expected continuation, got {other:?}"),
        }
        assert_eq!(session.questions.0.len(), 2);
    }

    #[tokio::test]
    async fn test_final_turn_with_summary_outage_still_completes() {
        let model = StubModel {
            fail_summary: true,
            ..Default::default()
        };
        let mut session = new_session(InterviewMode::Behavioral);

        for _ in 0..4 {
            advance(&model, &mut session, "My answer.", Utc::now())
                .await
                .unwrap();
        }
        let report = advance(&model, &mut session, "Final answer.", Utc::now())
            .await
            .unwrap();

        match report.outcome {
            TurnOutcome::Complete {
                overall_score,
                summary,
                ..
            } => {
                assert_eq!(overall_score, 80);
                assert!(!summary.is_empty());
                assert!(summary.contains("80/100"));
                assert!(summary.contains("behavioral"));
            }
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_advance_on_complete_session_is_rejected() {
        let model = StubModel::default();
        let mut session = new_session(InterviewMode::Behavioral);
        for _ in 0..5 {
            advance(&model, &mut session, "My answer.", Utc::now())
                .await
                .unwrap();
        }

        let result = advance(&model, &mut session, "One more.", Utc::now()).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        // Nothing was appended.
        assert_eq!(session.answers.0.len(), 5);
    }

    #[tokio::test]
    async fn test_missing_question_uses_sentinel() {
        let model = StubModel::default();
        let mut session = new_session(InterviewMode::Hr);
        session.questions.0.clear();

        advance(&model, &mut session, "My answer.", Utc::now())
            .await
            .unwrap();

        let evaluated = model.last_evaluated_question.lock().unwrap().clone();
        assert_eq!(evaluated.as_deref(), Some("Unknown question"));
        // The next question was still appended, restoring the invariant.
        assert!(session.answers.0.len() <= session.questions.0.len());
    }

    #[tokio::test]
    async fn test_open_session_outage_uses_bank_opener() {
        let model = StubModel {
            fail_opening: true,
            ..Default::default()
        };
        let question = open_session(&model, InterviewMode::Technical, "Backend Engineer").await;
        assert_eq!(question, fallback_question(InterviewMode::Technical, 0));
    }

    #[tokio::test]
    async fn test_out_of_range_model_score_is_clamped() {
        let model = StubModel::with_scores(&[140]);
        let mut session = new_session(InterviewMode::Hr);

        let report = advance(&model, &mut session, "My answer.", Utc::now())
            .await
            .unwrap();

        assert_eq!(report.evaluation.score, 100);
        assert_eq!(session.answers.0[0].score, 100);
    }
}
