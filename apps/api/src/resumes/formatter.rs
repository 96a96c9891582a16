//! Client for the external resume-formatting (beautifier) service.
//!
//! The service takes raw resume text plus a template name and returns
//! restyled text. It is best-effort: the generation pipeline falls back to
//! the unformatted text when this call fails.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Serialize)]
struct FormatRequest<'a> {
    text: &'a str,
    template: &'a str,
}

#[derive(Debug, Deserialize)]
struct FormatResponse {
    formatted: String,
}

#[derive(Clone)]
pub struct FormatterClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl FormatterClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .expect("Failed to build HTTP client"),
            base_url,
            api_key,
        }
    }

    /// Sends text through the formatting service and returns the styled text.
    pub async fn format(&self, text: &str, template: &str) -> Result<String, AppError> {
        let url = format!("{}/v1/format", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&FormatRequest { text, template })
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Formatter request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Formatter returned {status}: {body}"
            )));
        }

        let parsed: FormatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Formatter response malformed: {e}")))?;

        Ok(parsed.formatted)
    }
}
