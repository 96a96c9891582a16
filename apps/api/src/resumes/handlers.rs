//! Axum route handlers for the Resume API.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use chrono::Utc;
use serde::Deserialize;
use sqlx::types::Json as Jsonb;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::resume::{ResumeRow, ResumeVersion};
use crate::resumes::analysis::analyze_text;
use crate::resumes::generator::{generate_resume, GenerateResumeRequest};
use crate::resumes::upload::{extract_resume_text, is_pdf};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes
///
/// Multipart upload: `file` (PDF or plain text, required) and `title`
/// (optional). The original bytes are archived to S3; the extracted text is
/// what the rest of the system works with.
pub async fn handle_upload(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<ResumeRow>, AppError> {
    let mut title: Option<String> = None;
    let mut file_bytes: Option<Bytes> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("title") => {
                title = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(format!("Invalid title field: {e}")))?,
                );
            }
            Some("file") => {
                file_name = field.file_name().map(str::to_string);
                file_bytes = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(format!("Invalid file field: {e}")))?,
                );
            }
            _ => {}
        }
    }

    let bytes = file_bytes
        .ok_or_else(|| AppError::Validation("multipart field 'file' is required".to_string()))?;
    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    let raw_text = extract_resume_text(bytes.clone()).await?;

    let resume_id = Uuid::new_v4();
    let file_name = file_name.unwrap_or_else(|| "resume.txt".to_string());
    let s3_key = format!("resumes/{}/{}/{}", user.user_id, resume_id, file_name);
    let content_type = if is_pdf(&bytes) {
        "application/pdf"
    } else {
        "text/plain"
    };

    state
        .s3
        .put_object()
        .bucket(&state.config.s3_bucket)
        .key(&s3_key)
        .body(ByteStream::from(bytes.to_vec()))
        .content_type(content_type)
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

    let title = title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| file_name.clone());
    let now = Utc::now();

    let resume = sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes
            (id, user_id, title, raw_text, is_primary, versions, s3_key, source,
             created_at, updated_at)
        VALUES ($1, $2, $3, $4, FALSE, $5, $6, 'upload', $7, $7)
        RETURNING *
        "#,
    )
    .bind(resume_id)
    .bind(user.user_id)
    .bind(&title)
    .bind(&raw_text)
    .bind(Jsonb(Vec::<ResumeVersion>::new()))
    .bind(&s3_key)
    .bind(now)
    .fetch_one(&state.db)
    .await?;

    info!(
        "Uploaded resume {} ({} bytes) for user {}",
        resume_id,
        bytes.len(),
        user.user_id
    );

    Ok(Json(resume))
}

/// GET /api/v1/resumes
pub async fn handle_list(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    let resumes = sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user.user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(resumes))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<ResumeRow>, AppError> {
    let resume = fetch_resume(&state.db, resume_id, user.user_id).await?;
    Ok(Json(resume))
}

/// POST /api/v1/resumes/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<GenerateResumeRequest>,
) -> Result<Json<ResumeRow>, AppError> {
    let resume = generate_resume(
        &state.db,
        &state.llm,
        &state.formatter,
        user.user_id,
        request,
    )
    .await?;
    Ok(Json(resume))
}

/// POST /api/v1/resumes/:id/analyze
///
/// Runs the recruiter-style analysis and persists it on the document.
pub async fn handle_analyze(
    State(state): State<AppState>,
    user: AuthUser,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<ResumeRow>, AppError> {
    let resume = fetch_resume(&state.db, resume_id, user.user_id).await?;

    let analysis = analyze_text(&state.llm, &resume.raw_text).await?;

    let updated = sqlx::query_as::<_, ResumeRow>(
        r#"
        UPDATE resumes SET analysis = $1, updated_at = $2
        WHERE id = $3 AND user_id = $4
        RETURNING *
        "#,
    )
    .bind(Jsonb(&analysis))
    .bind(Utc::now())
    .bind(resume_id)
    .bind(user.user_id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(updated))
}

/// POST /api/v1/resumes/:id/primary
///
/// Marks one resume primary and clears the flag on every sibling in the same
/// transaction. At most one primary per user is an application rule, not a
/// DB constraint.
pub async fn handle_set_primary(
    State(state): State<AppState>,
    user: AuthUser,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<ResumeRow>, AppError> {
    let now = Utc::now();
    let mut tx = state.db.begin().await?;

    let resume = sqlx::query_as::<_, ResumeRow>(
        r#"
        UPDATE resumes SET is_primary = TRUE, updated_at = $1
        WHERE id = $2 AND user_id = $3
        RETURNING *
        "#,
    )
    .bind(now)
    .bind(resume_id)
    .bind(user.user_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;

    sqlx::query(
        r#"
        UPDATE resumes SET is_primary = FALSE, updated_at = $1
        WHERE user_id = $2 AND id <> $3 AND is_primary
        "#,
    )
    .bind(now)
    .bind(user.user_id)
    .bind(resume_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Json(resume))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddVersionRequest {
    pub content: String,
    pub note: Option<String>,
    pub score: Option<i32>,
}

/// POST /api/v1/resumes/:id/versions
///
/// Appends a revision to the version history and makes it the current text.
pub async fn handle_add_version(
    State(state): State<AppState>,
    user: AuthUser,
    Path(resume_id): Path<Uuid>,
    Json(request): Json<AddVersionRequest>,
) -> Result<Json<ResumeRow>, AppError> {
    if request.content.trim().is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }

    let resume = fetch_resume(&state.db, resume_id, user.user_id).await?;

    let mut versions = resume.versions.0;
    versions.push(ResumeVersion {
        version: versions.len() as i32 + 1,
        content: request.content.clone(),
        score: request.score,
        note: request.note,
        created_at: Utc::now(),
    });

    let updated = sqlx::query_as::<_, ResumeRow>(
        r#"
        UPDATE resumes SET raw_text = $1, versions = $2, updated_at = $3
        WHERE id = $4 AND user_id = $5
        RETURNING *
        "#,
    )
    .bind(&request.content)
    .bind(Jsonb(&versions))
    .bind(Utc::now())
    .bind(resume_id)
    .bind(user.user_id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(updated))
}

async fn fetch_resume(
    pool: &PgPool,
    resume_id: Uuid,
    user_id: Uuid,
) -> Result<ResumeRow, AppError> {
    sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
        .bind(resume_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_version_request_deserializes() {
        let json = serde_json::json!({
            "content": "Revised resume text",
            "note": "tightened the summary"
        });
        let request: AddVersionRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.content, "Revised resume text");
        assert!(request.score.is_none());
    }
}
