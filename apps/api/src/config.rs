use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub anthropic_api_key: String,
    /// HS256 secret shared with the identity provider that issues bearer tokens.
    pub auth_secret: String,
    /// Base URL of the resume-formatting (beautifier) service.
    pub formatter_url: String,
    pub formatter_api_key: String,
    /// Base URL of the speech provider (STT + TTS).
    pub speech_url: String,
    pub speech_api_key: String,
    /// Base URL of the external job-search provider.
    pub jobs_url: String,
    pub jobs_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            auth_secret: require_env("AUTH_SECRET")?,
            formatter_url: require_env("FORMATTER_URL")?,
            formatter_api_key: require_env("FORMATTER_API_KEY")?,
            speech_url: require_env("SPEECH_URL")?,
            speech_api_key: require_env("SPEECH_API_KEY")?,
            jobs_url: require_env("JOBS_URL")?,
            jobs_api_key: std::env::var("JOBS_API_KEY").ok(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
