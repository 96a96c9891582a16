use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A user's career profile. One row per user, upsert semantics — created on
/// first write, never explicitly created otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub skills: Vec<String>,
    pub target_roles: Vec<String>,
    pub locations: Vec<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub remote: bool,
    pub hybrid: bool,
    pub onsite: bool,
    pub years_experience: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
