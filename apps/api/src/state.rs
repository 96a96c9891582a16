use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::config::Config;
use crate::interview::model::InterviewModel;
use crate::jobs::provider::JobSearchClient;
use crate::llm_client::LlmClient;
use crate::resumes::formatter::FormatterClient;
use crate::speech::SpeechClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Short-TTL cache for external job-search pages.
    pub redis: RedisClient,
    /// Stores uploaded resume files.
    pub s3: S3Client,
    pub llm: LlmClient,
    /// Interview engine's view of the generative model. Trait object so
    /// tests can drive the engine without a provider.
    pub interview_model: Arc<dyn InterviewModel>,
    pub formatter: FormatterClient,
    pub speech: SpeechClient,
    pub jobs: JobSearchClient,
    pub config: Config,
}
