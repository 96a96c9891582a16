//! The InterviewModel seam — everything the engine needs from the
//! generative model, behind a trait so tests can run without a provider.
//!
//! Carried in `AppState` as `Arc<dyn InterviewModel>`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::interview::prompts::{
    mode_guidance, EVALUATE_TEMPLATE, NEXT_QUESTION_TEMPLATE, OPENING_QUESTION_TEMPLATE,
    QUESTION_SYSTEM, SUMMARY_TEMPLATE,
};
use crate::llm_client::prompts::{COACH_PERSONA, JSON_ONLY_SYSTEM, SCORE_RANGE_INSTRUCTION};
use crate::llm_client::LlmClient;
use crate::models::interview::{Evaluation, InterviewMode};

/// One question/answer pair with its score, serialized into follow-up and
/// summary prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub question: String,
    pub answer: String,
    pub score: i32,
    pub feedback: String,
}

#[async_trait]
pub trait InterviewModel: Send + Sync {
    async fn opening_question(
        &self,
        mode: InterviewMode,
        target_role: &str,
    ) -> Result<String, AppError>;

    async fn evaluate_answer(
        &self,
        target_role: &str,
        question: &str,
        answer: &str,
    ) -> Result<Evaluation, AppError>;

    async fn next_question(
        &self,
        mode: InterviewMode,
        target_role: &str,
        transcript: &[TranscriptEntry],
    ) -> Result<String, AppError>;

    async fn summarize(
        &self,
        mode: InterviewMode,
        target_role: &str,
        overall_score: i32,
        transcript: &[TranscriptEntry],
    ) -> Result<String, AppError>;
}

/// JSON envelope for generated questions.
#[derive(Debug, Deserialize)]
struct GeneratedQuestion {
    question: String,
}

/// Production implementation backed by the shared LLM client.
pub struct LiveInterviewModel {
    llm: LlmClient,
}

impl LiveInterviewModel {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    fn transcript_json(transcript: &[TranscriptEntry]) -> Result<String, AppError> {
        serde_json::to_string_pretty(transcript)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize transcript: {e}")))
    }
}

#[async_trait]
impl InterviewModel for LiveInterviewModel {
    async fn opening_question(
        &self,
        mode: InterviewMode,
        target_role: &str,
    ) -> Result<String, AppError> {
        let prompt = OPENING_QUESTION_TEMPLATE
            .replace("{mode_guidance}", mode_guidance(mode))
            .replace("{target_role}", target_role);

        let generated: GeneratedQuestion = self
            .llm
            .call_json(&prompt, QUESTION_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Opening question failed: {e}")))?;

        Ok(generated.question)
    }

    async fn evaluate_answer(
        &self,
        target_role: &str,
        question: &str,
        answer: &str,
    ) -> Result<Evaluation, AppError> {
        let prompt = EVALUATE_TEMPLATE
            .replace("{target_role}", target_role)
            .replace("{question}", question)
            .replace("{answer}", answer);

        let system = format!("{COACH_PERSONA} {JSON_ONLY_SYSTEM} {SCORE_RANGE_INSTRUCTION}");

        self.llm
            .call_json(&prompt, &system)
            .await
            .map_err(|e| AppError::Llm(format!("Answer evaluation failed: {e}")))
    }

    async fn next_question(
        &self,
        mode: InterviewMode,
        target_role: &str,
        transcript: &[TranscriptEntry],
    ) -> Result<String, AppError> {
        let prompt = NEXT_QUESTION_TEMPLATE
            .replace("{mode_guidance}", mode_guidance(mode))
            .replace("{target_role}", target_role)
            .replace("{transcript_json}", &Self::transcript_json(transcript)?);

        let generated: GeneratedQuestion = self
            .llm
            .call_json(&prompt, QUESTION_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Next question failed: {e}")))?;

        Ok(generated.question)
    }

    async fn summarize(
        &self,
        mode: InterviewMode,
        target_role: &str,
        overall_score: i32,
        transcript: &[TranscriptEntry],
    ) -> Result<String, AppError> {
        let prompt = SUMMARY_TEMPLATE
            .replace("{mode}", mode.as_str())
            .replace("{target_role}", target_role)
            .replace("{overall_score}", &overall_score.to_string())
            .replace("{transcript_json}", &Self::transcript_json(transcript)?);

        self.llm
            .call_text(&prompt, COACH_PERSONA)
            .await
            .map_err(|e| AppError::Llm(format!("Session summary failed: {e}")))
    }
}
