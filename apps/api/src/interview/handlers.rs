//! Axum route handlers for the Interview API.
//!
//! Persistence uses an optimistic `turn` counter: every session mutation is
//! `UPDATE ... WHERE id = $n AND turn = $m` and bumps the counter, so a
//! concurrent double-submit loses the check and gets 409 instead of
//! corrupting the question/answer lists.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::types::Json as Jsonb;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::interview::engine::{self, TurnOutcome};
use crate::models::interview::{Evaluation, InterviewMode, InterviewSessionRow};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartInterviewRequest {
    pub mode: String,
    pub target_role: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartedSession {
    pub id: Uuid,
    pub current_question: String,
    pub question_number: usize,
    pub total_questions: usize,
}

#[derive(Debug, Serialize)]
pub struct StartInterviewResponse {
    pub session: StartedSession,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    pub session_id: Uuid,
    pub answer: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedSession {
    pub overall_score: i32,
    pub total_questions: usize,
    pub feedback: String,
}

/// Either a continuation (next question) or the completion payload.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SubmitAnswerResponse {
    #[serde(rename_all = "camelCase")]
    InProgress {
        complete: bool,
        evaluation: Evaluation,
        next_question: String,
        question_number: usize,
        total_questions: usize,
    },
    #[serde(rename_all = "camelCase")]
    Complete {
        complete: bool,
        evaluation: Evaluation,
        session: CompletedSession,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interview/start
///
/// Creates a session with one pre-generated opening question.
pub async fn handle_start(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<StartInterviewRequest>,
) -> Result<Json<StartInterviewResponse>, AppError> {
    let mode = InterviewMode::parse(&request.mode).ok_or_else(|| {
        AppError::Validation(format!(
            "mode must be one of hr, technical, behavioral (got '{}')",
            request.mode
        ))
    })?;
    if request.target_role.trim().is_empty() {
        return Err(AppError::Validation(
            "targetRole cannot be empty".to_string(),
        ));
    }

    let first_question =
        engine::open_session(state.interview_model.as_ref(), mode, &request.target_role).await;

    let session_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO interview_sessions
            (id, user_id, mode, target_role, questions, answers, turn, started_at)
        VALUES ($1, $2, $3, $4, $5, $6, 0, $7)
        "#,
    )
    .bind(session_id)
    .bind(user.user_id)
    .bind(mode.as_str())
    .bind(request.target_role.trim())
    .bind(Jsonb(vec![first_question.clone()]))
    .bind(Jsonb(Vec::<serde_json::Value>::new()))
    .bind(Utc::now())
    .execute(&state.db)
    .await?;

    info!(
        "Started {} interview session {} for user {}",
        mode.as_str(),
        session_id,
        user.user_id
    );

    Ok(Json(StartInterviewResponse {
        session: StartedSession {
            id: session_id,
            current_question: first_question,
            question_number: 1,
            total_questions: mode.total_questions(),
        },
    }))
}

/// POST /api/v1/interview/next
///
/// The core transition: evaluate the submitted answer, then either issue the
/// next question or finalize the session.
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<SubmitAnswerRequest>,
) -> Result<Json<SubmitAnswerResponse>, AppError> {
    if request.answer.trim().is_empty() {
        return Err(AppError::Validation("answer cannot be empty".to_string()));
    }

    let mut session = fetch_session(&state.db, request.session_id, user.user_id).await?;
    let expected_turn = session.turn;

    let report = engine::advance(
        state.interview_model.as_ref(),
        &mut session,
        request.answer.trim(),
        Utc::now(),
    )
    .await?;

    let updated = sqlx::query(
        r#"
        UPDATE interview_sessions
        SET questions = $1, answers = $2, overall_score = $3, summary = $4,
            completed_at = $5, turn = turn + 1
        WHERE id = $6 AND user_id = $7 AND turn = $8
        "#,
    )
    .bind(&session.questions)
    .bind(&session.answers)
    .bind(session.overall_score)
    .bind(&session.summary)
    .bind(session.completed_at)
    .bind(session.id)
    .bind(user.user_id)
    .bind(expected_turn)
    .execute(&state.db)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::Conflict(
            "Session was modified by another request; retry".to_string(),
        ));
    }

    let response = match report.outcome {
        TurnOutcome::Continue {
            next_question,
            question_number,
            total_questions,
        } => SubmitAnswerResponse::InProgress {
            complete: false,
            evaluation: report.evaluation,
            next_question,
            question_number,
            total_questions,
        },
        TurnOutcome::Complete {
            overall_score,
            summary,
            total_questions,
        } => {
            info!(
                "Completed interview session {} for user {} (overall {})",
                session.id, user.user_id, overall_score
            );
            SubmitAnswerResponse::Complete {
                complete: true,
                evaluation: report.evaluation,
                session: CompletedSession {
                    overall_score,
                    total_questions,
                    feedback: summary,
                },
            }
        }
    };

    Ok(Json(response))
}

/// GET /api/v1/interview/sessions
pub async fn handle_list_sessions(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<InterviewSessionRow>>, AppError> {
    let sessions = sqlx::query_as::<_, InterviewSessionRow>(
        "SELECT * FROM interview_sessions WHERE user_id = $1 ORDER BY started_at DESC",
    )
    .bind(user.user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(sessions))
}

/// GET /api/v1/interview/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    user: AuthUser,
    Path(session_id): Path<Uuid>,
) -> Result<Json<InterviewSessionRow>, AppError> {
    let session = fetch_session(&state.db, session_id, user.user_id).await?;
    Ok(Json(session))
}

async fn fetch_session(
    pool: &PgPool,
    session_id: Uuid,
    user_id: Uuid,
) -> Result<InterviewSessionRow, AppError> {
    sqlx::query_as::<_, InterviewSessionRow>(
        "SELECT * FROM interview_sessions WHERE id = $1 AND user_id = $2",
    )
    .bind(session_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_request_deserializes_camel_case() {
        let json = serde_json::json!({
            "mode": "technical",
            "targetRole": "Backend Engineer"
        });
        let request: StartInterviewRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.mode, "technical");
        assert_eq!(request.target_role, "Backend Engineer");
    }

    #[test]
    fn test_in_progress_response_shape() {
        let response = SubmitAnswerResponse::InProgress {
            complete: false,
            evaluation: Evaluation {
                score: 82,
                feedback: "Good".to_string(),
                strengths: vec![],
                improvements: vec![],
            },
            next_question: "Next?".to_string(),
            question_number: 2,
            total_questions: 8,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["complete"], false);
        assert_eq!(json["nextQuestion"], "Next?");
        assert_eq!(json["questionNumber"], 2);
        assert_eq!(json["totalQuestions"], 8);
        assert!(json.get("session").is_none());
    }

    #[test]
    fn test_complete_response_shape() {
        let response = SubmitAnswerResponse::Complete {
            complete: true,
            evaluation: Evaluation {
                score: 90,
                feedback: "Strong".to_string(),
                strengths: vec![],
                improvements: vec![],
            },
            session: CompletedSession {
                overall_score: 80,
                total_questions: 5,
                feedback: "Well done overall.".to_string(),
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["complete"], true);
        assert_eq!(json["session"]["overallScore"], 80);
        assert_eq!(json["session"]["totalQuestions"], 5);
        assert!(json.get("nextQuestion").is_none());
    }
}
