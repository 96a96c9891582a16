//! Career profile — one document per user with upsert semantics: created on
//! first write, never explicitly created otherwise.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::profile::ProfileRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub headline: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub target_roles: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    #[serde(default)]
    pub remote: bool,
    #[serde(default)]
    pub hybrid: bool,
    #[serde(default)]
    pub onsite: bool,
    pub years_experience: Option<i32>,
}

impl UpdateProfileRequest {
    fn validate(&self) -> Result<(), AppError> {
        if let (Some(min), Some(max)) = (self.salary_min, self.salary_max) {
            if min > max {
                return Err(AppError::ValidationDetailed {
                    message: "salaryMin cannot exceed salaryMax".to_string(),
                    details: serde_json::json!({
                        "salaryMin": min,
                        "salaryMax": max,
                    }),
                });
            }
        }
        if self.years_experience.is_some_and(|y| y < 0) {
            return Err(AppError::Validation(
                "yearsExperience cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ProfileRow>, AppError> {
    let profile = sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE user_id = $1")
        .bind(user.user_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile has not been set up yet".to_string()))?;

    Ok(Json(profile))
}

/// PUT /api/v1/profile
///
/// Full-document upsert: the request body replaces the profile.
pub async fn handle_put_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileRow>, AppError> {
    request.validate()?;

    let now = Utc::now();
    let profile = sqlx::query_as::<_, ProfileRow>(
        r#"
        INSERT INTO profiles
            (user_id, headline, summary, skills, target_roles, locations,
             salary_min, salary_max, remote, hybrid, onsite, years_experience,
             created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $13)
        ON CONFLICT (user_id) DO UPDATE SET
            headline = EXCLUDED.headline,
            summary = EXCLUDED.summary,
            skills = EXCLUDED.skills,
            target_roles = EXCLUDED.target_roles,
            locations = EXCLUDED.locations,
            salary_min = EXCLUDED.salary_min,
            salary_max = EXCLUDED.salary_max,
            remote = EXCLUDED.remote,
            hybrid = EXCLUDED.hybrid,
            onsite = EXCLUDED.onsite,
            years_experience = EXCLUDED.years_experience,
            updated_at = EXCLUDED.updated_at
        RETURNING *
        "#,
    )
    .bind(user.user_id)
    .bind(&request.headline)
    .bind(&request.summary)
    .bind(&request.skills)
    .bind(&request.target_roles)
    .bind(&request.locations)
    .bind(request.salary_min)
    .bind(request.salary_max)
    .bind(request.remote)
    .bind(request.hybrid)
    .bind(request.onsite)
    .bind(request.years_experience)
    .bind(now)
    .fetch_one(&state.db)
    .await?;

    info!("Upserted profile for user {}", user.user_id);

    Ok(Json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salary_range_validation() {
        let request: UpdateProfileRequest = serde_json::from_value(serde_json::json!({
            "salaryMin": 120_000,
            "salaryMax": 90_000
        }))
        .unwrap();
        assert!(matches!(
            request.validate(),
            Err(AppError::ValidationDetailed { .. })
        ));
    }

    #[test]
    fn test_minimal_body_deserializes_with_defaults() {
        let request: UpdateProfileRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(request.skills.is_empty());
        assert!(!request.remote);
        assert!(request.validate().is_ok());
    }
}
