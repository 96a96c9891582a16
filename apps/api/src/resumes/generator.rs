//! Resume generation — a two-stage pipeline.
//!
//! Stage 1: assemble a prompt from the profile's structured fields plus the
//! target role and template style, and ask the model for an 800-1200 word
//! plain-text resume. Outputs under 400 words are rejected.
//! Stage 2: forward the text to the formatting service for final styling,
//! falling back to the stage-1 text verbatim if that service errors.
//!
//! The result is persisted as a new non-primary resume. No retries, no
//! concurrency — one linear pass with a fallback at each stage.

use chrono::Utc;
use serde::Deserialize;
use sqlx::types::Json as Jsonb;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::profile::ProfileRow;
use crate::models::resume::{ResumeRow, ResumeVersion};
use crate::resumes::formatter::FormatterClient;
use crate::resumes::prompts::{GENERATION_SYSTEM, GENERATION_TEMPLATE};

/// Generated output below this word count is rejected as unusable.
const MIN_WORDS: usize = 400;

/// Fixed template style enumeration for generated resumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeTemplate {
    Modern,
    Classic,
    Creative,
    Minimal,
}

impl ResumeTemplate {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "modern" => Some(Self::Modern),
            "classic" => Some(Self::Classic),
            "creative" => Some(Self::Creative),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Modern => "modern",
            Self::Classic => "classic",
            Self::Creative => "creative",
            Self::Minimal => "minimal",
        }
    }

    fn guidance(&self) -> &'static str {
        match self {
            Self::Modern => {
                "Modern style: tight summary up front, skills grouped by \
                 category, accomplishment-led experience bullets."
            }
            Self::Classic => {
                "Classic style: reverse-chronological, formal register, \
                 education before skills."
            }
            Self::Creative => {
                "Creative style: narrative summary, personality allowed in \
                 wording, still factual throughout."
            }
            Self::Minimal => {
                "Minimal style: short sentences, no filler adjectives, \
                 whitespace over density."
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResumeRequest {
    pub target_role: String,
    pub template: String,
    pub title: Option<String>,
}

/// Runs the full generation pipeline and persists the result.
pub async fn generate_resume(
    pool: &PgPool,
    llm: &LlmClient,
    formatter: &FormatterClient,
    user_id: Uuid,
    request: GenerateResumeRequest,
) -> Result<ResumeRow, AppError> {
    let template = ResumeTemplate::parse(&request.template).ok_or_else(|| {
        AppError::Validation(format!(
            "template must be one of modern, classic, creative, minimal (got '{}')",
            request.template
        ))
    })?;
    if request.target_role.trim().is_empty() {
        return Err(AppError::Validation(
            "targetRole cannot be empty".to_string(),
        ));
    }

    let profile = sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| {
            AppError::Validation(
                "No profile found. Fill in your profile before generating a resume.".to_string(),
            )
        })?;

    // Stage 1: generate plain text from the profile.
    let prompt = build_generation_prompt(&profile, &request.target_role, template)?;
    let draft = llm
        .call_text(&prompt, GENERATION_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Resume generation failed: {e}")))?;

    let words = word_count(&draft);
    if words < MIN_WORDS {
        return Err(AppError::UnprocessableEntity(format!(
            "Generated resume is too short ({words} words, minimum {MIN_WORDS}); try again"
        )));
    }

    // Stage 2: external formatting, best-effort.
    let final_text = match formatter.format(&draft, template.as_str()).await {
        Ok(formatted) => formatted,
        Err(e) => {
            warn!(
                user_id = %user_id,
                stage = "formatter",
                "Formatting service failed, keeping unformatted text: {e}"
            );
            draft
        }
    };

    let resume_id = Uuid::new_v4();
    let title = request
        .title
        .unwrap_or_else(|| format!("{} resume", request.target_role.trim()));
    let now = Utc::now();

    let resume = sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes
            (id, user_id, title, raw_text, template, is_primary, versions, source,
             created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, FALSE, $6, 'generated', $7, $7)
        RETURNING *
        "#,
    )
    .bind(resume_id)
    .bind(user_id)
    .bind(&title)
    .bind(&final_text)
    .bind(template.as_str())
    .bind(Jsonb(Vec::<ResumeVersion>::new()))
    .bind(now)
    .fetch_one(pool)
    .await?;

    info!(
        "Generated resume {} ({} words, template {}) for user {}",
        resume_id,
        words,
        template.as_str(),
        user_id
    );

    Ok(resume)
}

/// Builds the stage-1 prompt from the profile's structured fields.
fn build_generation_prompt(
    profile: &ProfileRow,
    target_role: &str,
    template: ResumeTemplate,
) -> Result<String, AppError> {
    let profile_json = serde_json::to_string_pretty(&serde_json::json!({
        "headline": profile.headline,
        "summary": profile.summary,
        "skills": profile.skills,
        "target_roles": profile.target_roles,
        "locations": profile.locations,
        "years_experience": profile.years_experience,
        "work_preference": {
            "remote": profile.remote,
            "hybrid": profile.hybrid,
            "onsite": profile.onsite,
        },
    }))
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize profile: {e}")))?;

    Ok(GENERATION_TEMPLATE
        .replace("{profile_json}", &profile_json)
        .replace("{target_role}", target_role)
        .replace("{template_guidance}", template.guidance()))
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
