pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::chat;
use crate::interview::handlers as interview;
use crate::jobs::handlers as jobs;
use crate::profile;
use crate::resumes::handlers as resumes;
use crate::speech;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profile
        .route(
            "/api/v1/profile",
            get(profile::handle_get_profile).put(profile::handle_put_profile),
        )
        // Resumes
        .route(
            "/api/v1/resumes",
            post(resumes::handle_upload).get(resumes::handle_list),
        )
        .route("/api/v1/resumes/generate", post(resumes::handle_generate))
        .route("/api/v1/resumes/:id", get(resumes::handle_get))
        .route("/api/v1/resumes/:id/analyze", post(resumes::handle_analyze))
        .route(
            "/api/v1/resumes/:id/primary",
            post(resumes::handle_set_primary),
        )
        .route(
            "/api/v1/resumes/:id/versions",
            post(resumes::handle_add_version),
        )
        // Interview practice
        .route("/api/v1/interview/start", post(interview::handle_start))
        .route(
            "/api/v1/interview/next",
            post(interview::handle_submit_answer),
        )
        .route(
            "/api/v1/interview/sessions",
            get(interview::handle_list_sessions),
        )
        .route(
            "/api/v1/interview/sessions/:id",
            get(interview::handle_get_session),
        )
        // Jobs and applications
        .route("/api/v1/jobs", get(jobs::handle_search))
        .route(
            "/api/v1/applications",
            post(jobs::handle_create_application).get(jobs::handle_list_applications),
        )
        .route(
            "/api/v1/applications/:id",
            patch(jobs::handle_update_application),
        )
        // Chat assistant
        .route("/api/v1/chat", post(chat::handle_chat))
        // Speech
        .route("/api/v1/speech/transcribe", post(speech::handle_transcribe))
        .route("/api/v1/speech/synthesize", post(speech::handle_synthesize))
        .with_state(state)
}
