//! Speech — thin wrappers around the external STT/TTS provider, used by the
//! interview flow for voice answers and spoken questions.

use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::state::AppState;

const DEFAULT_VOICE: &str = "alloy";

// ────────────────────────────────────────────────────────────────────────────
// Provider client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    voice: &'a str,
}

#[derive(Clone)]
pub struct SpeechClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SpeechClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            base_url,
            api_key,
        }
    }

    /// Audio in, transcript out.
    pub async fn transcribe(&self, audio: Bytes, file_name: String) -> Result<String, AppError> {
        let url = format!("{}/v1/transcriptions", self.base_url.trim_end_matches('/'));

        let part = Part::bytes(audio.to_vec()).file_name(file_name);
        let form = Form::new().part("audio", part);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Transcription request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Speech provider returned {status}: {body}"
            )));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Transcription response malformed: {e}")))?;

        Ok(parsed.text)
    }

    /// Text in, audio bytes out (MP3).
    pub async fn synthesize(&self, text: &str, voice: &str) -> Result<Bytes, AppError> {
        let url = format!("{}/v1/speech", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&SynthesisRequest { text, voice })
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Synthesis request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Speech provider returned {status}: {body}"
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| AppError::Upstream(format!("Synthesis body read failed: {e}")))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub transcript: String,
}

/// POST /api/v1/speech/transcribe
///
/// Multipart field `audio` → transcript.
pub async fn handle_transcribe(
    State(state): State<AppState>,
    _user: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<TranscribeResponse>, AppError> {
    let mut audio: Option<(Bytes, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some("audio") {
            let file_name = field
                .file_name()
                .unwrap_or("answer.webm")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Invalid audio field: {e}")))?;
            audio = Some((bytes, file_name));
        }
    }

    let (bytes, file_name) = audio
        .ok_or_else(|| AppError::Validation("multipart field 'audio' is required".to_string()))?;
    if bytes.is_empty() {
        return Err(AppError::Validation("Audio payload is empty".to_string()));
    }

    let transcript = state.speech.transcribe(bytes, file_name).await?;

    Ok(Json(TranscribeResponse { transcript }))
}

#[derive(Debug, Deserialize)]
pub struct SynthesizeRequest {
    pub text: String,
    pub voice: Option<String>,
}

/// POST /api/v1/speech/synthesize
///
/// Returns raw MP3 bytes.
pub async fn handle_synthesize(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(request): Json<SynthesizeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    let voice = request.voice.as_deref().unwrap_or(DEFAULT_VOICE);
    let audio = state.speech.synthesize(&request.text, voice).await?;

    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesize_request_voice_is_optional() {
        let request: SynthesizeRequest =
            serde_json::from_value(serde_json::json!({"text": "Next question"})).unwrap();
        assert!(request.voice.is_none());
    }
}
