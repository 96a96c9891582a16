use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// AI analysis metadata attached to a resume after `POST /resumes/:id/analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub score: i32,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub keywords: Vec<String>,
}

/// One snapshot in a resume's version history (JSONB array on the row).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeVersion {
    pub version: i32,
    pub content: String,
    pub score: Option<i32>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub raw_text: String,
    /// Template style requested at generation time; absent for uploads.
    pub template: Option<String>,
    pub analysis: Option<Json<ResumeAnalysis>>,
    /// At most one resume per user carries this flag. Enforced at write time
    /// by clearing siblings in the same transaction, not by a DB constraint.
    pub is_primary: bool,
    pub versions: Json<Vec<ResumeVersion>>,
    /// S3 key of the original uploaded file, when the resume came from an upload.
    pub s3_key: Option<String>,
    /// "upload" or "generated".
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_deserializes_from_model_output() {
        let json = r#"{
            "score": 78,
            "strengths": ["strong action verbs", "quantified impact"],
            "improvements": ["add a skills section"],
            "keywords": ["Rust", "distributed systems"]
        }"#;
        let analysis: ResumeAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.score, 78);
        assert_eq!(analysis.keywords.len(), 2);
    }

    #[test]
    fn test_version_serializes_camel_case() {
        let version = ResumeVersion {
            version: 2,
            content: "revised text".to_string(),
            score: Some(81),
            note: Some("tightened summary".to_string()),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&version).unwrap();
        assert!(json.get("createdAt").is_some());
    }
}
