//! Resume analysis — asks the model for a recruiter-style review of a stored
//! resume and returns structured metadata (score, strengths, improvements,
//! evidenced keywords).

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::resume::ResumeAnalysis;
use crate::resumes::prompts::{ANALYSIS_SYSTEM, ANALYSIS_TEMPLATE};

pub async fn analyze_text(llm: &LlmClient, resume_text: &str) -> Result<ResumeAnalysis, AppError> {
    let prompt = ANALYSIS_TEMPLATE.replace("{resume_text}", resume_text);

    let mut analysis: ResumeAnalysis = llm
        .call_json(&prompt, ANALYSIS_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Resume analysis failed: {e}")))?;

    analysis.score = analysis.score.clamp(0, 100);
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_prompt_embeds_resume() {
        let prompt = ANALYSIS_TEMPLATE.replace("{resume_text}", "Jane Doe — Rust engineer");
        assert!(prompt.contains("Jane Doe"));
        assert!(!prompt.contains("{resume_text}"));
    }
}
