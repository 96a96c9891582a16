mod auth;
mod chat;
mod config;
mod db;
mod errors;
mod interview;
mod jobs;
mod llm_client;
mod models;
mod profile;
mod resumes;
mod routes;
mod speech;
mod state;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::interview::model::LiveInterviewModel;
use crate::jobs::provider::JobSearchClient;
use crate::llm_client::LlmClient;
use crate::resumes::formatter::FormatterClient;
use crate::routes::build_router;
use crate::speech::SpeechClient;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("ascent_api={},tower_http=info", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Ascent API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;

    // Initialize Redis (jobs cache)
    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    // Initialize S3 / MinIO (uploaded resume files)
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // Initialize the LLM client and the interview engine's model seam
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    let interview_model = Arc::new(LiveInterviewModel::new(llm.clone()));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // External service clients
    let formatter = FormatterClient::new(
        config.formatter_url.clone(),
        config.formatter_api_key.clone(),
    );
    let speech = SpeechClient::new(config.speech_url.clone(), config.speech_api_key.clone());
    let jobs = JobSearchClient::new(config.jobs_url.clone(), config.jobs_api_key.clone());

    // Build app state
    let state = AppState {
        db,
        redis,
        s3,
        llm,
        interview_model,
        formatter,
        speech,
        jobs,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "ascent-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
