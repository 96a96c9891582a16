use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A job listing normalized from the external search provider. Listings are
/// global — not user-owned and not persisted; they live only in the Redis
/// cache between provider fetches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    /// Provider-side identifier (slug or numeric id as text).
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub url: String,
    pub remote: bool,
    pub tags: Vec<String>,
    pub posted_at: Option<DateTime<Utc>>,
    pub description: String,
    pub source: String,
}

/// Tracked pipeline stage of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Saved,
    Applied,
    Interviewing,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "saved" => Some(Self::Saved),
            "applied" => Some(Self::Applied),
            "interviewing" => Some(Self::Interviewing),
            "offer" => Some(Self::Offer),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::Applied => "applied",
            Self::Interviewing => "interviewing",
            Self::Offer => "offer",
            Self::Rejected => "rejected",
        }
    }
}

/// Joins a user to an external listing by reference. The listing fields are
/// denormalized at apply time since listings expire upstream.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: String,
    pub job_title: String,
    pub company: String,
    pub url: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_roundtrip() {
        for status in [
            ApplicationStatus::Saved,
            ApplicationStatus::Applied,
            ApplicationStatus::Interviewing,
            ApplicationStatus::Offer,
            ApplicationStatus::Rejected,
        ] {
            assert_eq!(ApplicationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ApplicationStatus::parse("ghosted"), None);
    }
}
