//! Client for the external job-search provider.
//!
//! The provider returns a JSON page of listings under `data`; fields vary in
//! presence, so normalization is tolerant — a listing missing optional fields
//! still comes through, while entries without a title or URL are dropped.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::errors::AppError;
use crate::models::job::JobListing;

const SOURCE_NAME: &str = "jobboard";

#[derive(Debug, Clone)]
pub struct JobQuery {
    pub query: String,
    pub location: Option<String>,
}

#[derive(Clone)]
pub struct JobSearchClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl JobSearchClient {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            base_url,
            api_key,
        }
    }

    /// Fetches one page of listings matching the query.
    pub async fn search(&self, query: &JobQuery) -> Result<Vec<JobListing>, AppError> {
        let url = format!("{}/api/search", self.base_url.trim_end_matches('/'));

        let mut request = self.client.get(&url).query(&[("q", query.query.as_str())]);
        if let Some(location) = &query.location {
            request = request.query(&[("location", location.as_str())]);
        }
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Job provider request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Job provider returned {status}: {body}"
            )));
        }

        let page: Value = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Job provider response malformed: {e}")))?;

        let listings = normalize_page(&page);
        debug!(
            "Job provider returned {} usable listings for '{}'",
            listings.len(),
            query.query
        );
        Ok(listings)
    }
}

/// Normalizes a provider page into the uniform listing shape.
pub fn normalize_page(page: &Value) -> Vec<JobListing> {
    let Some(data) = page["data"].as_array() else {
        return vec![];
    };

    data.iter().filter_map(normalize_listing).collect()
}

fn normalize_listing(raw: &Value) -> Option<JobListing> {
    let title = raw["title"].as_str()?.trim();
    let url = raw["url"].as_str()?.trim();
    if title.is_empty() || url.is_empty() {
        return None;
    }

    let id = raw["slug"]
        .as_str()
        .or_else(|| raw["id"].as_str())
        .map(str::to_string)
        .unwrap_or_else(|| url.to_string());

    let tags = raw["tags"]
        .as_array()
        .map(|values| {
            values
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(JobListing {
        id,
        title: title.to_string(),
        company: raw["company_name"]
            .as_str()
            .or_else(|| raw["company"].as_str())
            .unwrap_or("Unknown company")
            .to_string(),
        location: raw["location"].as_str().unwrap_or("Unspecified").to_string(),
        url: url.to_string(),
        remote: raw["remote"].as_bool().unwrap_or(false),
        tags,
        posted_at: parse_posted_at(&raw["created_at"]),
        description: raw["description"].as_str().unwrap_or("").to_string(),
        source: SOURCE_NAME.to_string(),
    })
}

/// Providers send timestamps either as epoch seconds or RFC 3339 strings.
fn parse_posted_at(value: &Value) -> Option<DateTime<Utc>> {
    if let Some(epoch) = value.as_i64() {
        return DateTime::from_timestamp(epoch, 0);
    }
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page() -> Value {
        serde_json::json!({
            "data": [
                {
                    "slug": "rust-engineer-acme",
                    "title": "Rust Engineer",
                    "company_name": "Acme",
                    "location": "Berlin",
                    "url": "https://jobs.example.com/rust-engineer-acme",
                    "remote": true,
                    "tags": ["rust", "backend"],
                    "created_at": 1754300000,
                    "description": "Build systems."
                },
                {
                    "title": "",
                    "url": "https://jobs.example.com/empty-title"
                },
                {
                    "title": "No URL role"
                },
                {
                    "id": "fallback-id",
                    "title": "Platform Engineer",
                    "url": "https://jobs.example.com/platform",
                    "created_at": "2026-08-01T09:00:00+00:00"
                }
            ]
        })
    }

    #[test]
    fn test_normalize_drops_unusable_entries() {
        let listings = normalize_page(&sample_page());
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].id, "rust-engineer-acme");
        assert_eq!(listings[1].id, "fallback-id");
    }

    #[test]
    fn test_normalize_fills_defaults() {
        let listings = normalize_page(&sample_page());
        let platform = &listings[1];
        assert_eq!(platform.company, "Unknown company");
        assert_eq!(platform.location, "Unspecified");
        assert!(!platform.remote);
        assert!(platform.tags.is_empty());
    }

    #[test]
    fn test_posted_at_parses_both_formats() {
        let listings = normalize_page(&sample_page());
        assert!(listings[0].posted_at.is_some());
        assert!(listings[1].posted_at.is_some());
    }

    #[test]
    fn test_normalize_tolerates_missing_data_array() {
        assert!(normalize_page(&serde_json::json!({"error": "down"})).is_empty());
    }
}
