//! Chat assistant — a stateless request/response wrapper around the model.
//! Conversation history is client-held; the server stores nothing.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::llm_client::prompts::COACH_PERSONA;
use crate::llm_client::ChatTurn;
use crate::state::AppState;

/// Older turns beyond this are dropped before the call; the client keeps the
/// full history, the model only needs recent context.
const MAX_HISTORY_TURNS: usize = 20;

const CHAT_SYSTEM_EXTRA: &str = "You are the in-app assistant of a job-search \
    product. Help with resumes, interview preparation, job search strategy, \
    and career questions. Keep answers concise and actionable. If asked about \
    something unrelated to careers, politely steer back.";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /api/v1/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }
    if let Some(turn) = request
        .history
        .iter()
        .find(|t| t.role != "user" && t.role != "assistant")
    {
        return Err(AppError::Validation(format!(
            "history roles must be 'user' or 'assistant' (got '{}')",
            turn.role
        )));
    }

    let messages = build_messages(&request);
    let system = format!("{COACH_PERSONA} {CHAT_SYSTEM_EXTRA}");

    let response = state
        .llm
        .call_chat(&messages, &system)
        .await
        .map_err(|e| AppError::Llm(format!("Chat call failed: {e}")))?;

    let reply = response
        .text()
        .map(str::to_string)
        .ok_or_else(|| AppError::Llm("Chat model returned empty content".to_string()))?;

    Ok(Json(ChatResponse { reply }))
}

/// Recent history plus the new user message, oldest first.
fn build_messages(request: &ChatRequest) -> Vec<ChatTurn> {
    let tail_start = request.history.len().saturating_sub(MAX_HISTORY_TURNS);
    let mut messages: Vec<ChatTurn> = request.history[tail_start..].to_vec();
    messages.push(ChatTurn {
        role: "user".to_string(),
        content: request.message.clone(),
    });
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(role: &str, content: &str) -> ChatTurn {
        ChatTurn {
            role: role.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_build_messages_appends_new_message() {
        let request = ChatRequest {
            message: "How do I negotiate salary?".to_string(),
            history: vec![turn("user", "Hi"), turn("assistant", "Hello!")],
        };
        let messages = build_messages(&request);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].role, "user");
        assert_eq!(messages[2].content, "How do I negotiate salary?");
    }

    #[test]
    fn test_build_messages_truncates_old_history() {
        let history: Vec<ChatTurn> = (0..50)
            .map(|i| {
                turn(
                    if i % 2 == 0 { "user" } else { "assistant" },
                    &format!("turn {i}"),
                )
            })
            .collect();
        let request = ChatRequest {
            message: "latest".to_string(),
            history,
        };
        let messages = build_messages(&request);
        assert_eq!(messages.len(), MAX_HISTORY_TURNS + 1);
        assert_eq!(messages[0].content, "turn 30");
    }

    #[test]
    fn test_request_defaults_to_empty_history() {
        let request: ChatRequest =
            serde_json::from_value(serde_json::json!({"message": "hello"})).unwrap();
        assert!(request.history.is_empty());
    }
}
