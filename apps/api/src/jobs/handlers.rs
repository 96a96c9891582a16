//! Axum route handlers for job search and application tracking.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::jobs::cache;
use crate::jobs::provider::JobQuery;
use crate::models::job::{ApplicationRow, ApplicationStatus, JobListing};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Job search
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct JobSearchParams {
    pub query: String,
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobSearchResponse {
    pub listings: Vec<JobListing>,
    pub cached: bool,
}

/// GET /api/v1/jobs?query=..&location=..
///
/// Serves from the Redis cache when warm, otherwise fetches and normalizes a
/// fresh page from the provider.
pub async fn handle_search(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<JobSearchParams>,
) -> Result<Json<JobSearchResponse>, AppError> {
    if params.query.trim().is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }

    let query = JobQuery {
        query: params.query,
        location: params.location,
    };
    let key = cache::cache_key(&query);

    if let Some(listings) = cache::get_cached(&state.redis, &key).await {
        return Ok(Json(JobSearchResponse {
            listings,
            cached: true,
        }));
    }

    let listings = state.jobs.search(&query).await?;
    cache::put_cached(&state.redis, &key, &listings).await;

    Ok(Json(JobSearchResponse {
        listings,
        cached: false,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Applications
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationRequest {
    pub job_id: String,
    pub job_title: String,
    pub company: String,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

/// POST /api/v1/applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateApplicationRequest>,
) -> Result<Json<ApplicationRow>, AppError> {
    if request.job_id.trim().is_empty() || request.job_title.trim().is_empty() {
        return Err(AppError::Validation(
            "jobId and jobTitle are required".to_string(),
        ));
    }

    let status = parse_status(request.status.as_deref().unwrap_or("saved"))?;
    let now = Utc::now();

    let application = sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications
            (id, user_id, job_id, job_title, company, url, status, notes,
             created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(request.job_id.trim())
    .bind(request.job_title.trim())
    .bind(request.company.trim())
    .bind(&request.url)
    .bind(status.as_str())
    .bind(&request.notes)
    .bind(now)
    .fetch_one(&state.db)
    .await?;

    info!(
        "User {} tracked application for '{}'",
        user.user_id, application.job_title
    );

    Ok(Json(application))
}

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ApplicationRow>>, AppError> {
    let applications = sqlx::query_as::<_, ApplicationRow>(
        "SELECT * FROM applications WHERE user_id = $1 ORDER BY updated_at DESC",
    )
    .bind(user.user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(applications))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationRequest {
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// PATCH /api/v1/applications/:id
pub async fn handle_update_application(
    State(state): State<AppState>,
    user: AuthUser,
    Path(application_id): Path<Uuid>,
    Json(request): Json<UpdateApplicationRequest>,
) -> Result<Json<ApplicationRow>, AppError> {
    let status = request.status.as_deref().map(parse_status).transpose()?;

    let updated = sqlx::query_as::<_, ApplicationRow>(
        r#"
        UPDATE applications
        SET status = COALESCE($1, status),
            notes = COALESCE($2, notes),
            updated_at = $3
        WHERE id = $4 AND user_id = $5
        RETURNING *
        "#,
    )
    .bind(status.map(|s| s.as_str()))
    .bind(&request.notes)
    .bind(Utc::now())
    .bind(application_id)
    .bind(user.user_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Application {application_id} not found")))?;

    Ok(Json(updated))
}

fn parse_status(s: &str) -> Result<ApplicationStatus, AppError> {
    ApplicationStatus::parse(s).ok_or_else(|| {
        AppError::Validation(format!(
            "status must be one of saved, applied, interviewing, offer, rejected (got '{s}')"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_deserializes_camel_case() {
        let json = serde_json::json!({
            "jobId": "rust-engineer-acme",
            "jobTitle": "Rust Engineer",
            "company": "Acme"
        });
        let request: CreateApplicationRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.job_id, "rust-engineer-acme");
        assert!(request.status.is_none());
    }

    #[test]
    fn test_parse_status_rejects_unknown() {
        assert!(parse_status("applied").is_ok());
        assert!(parse_status("ghosted").is_err());
    }
}
