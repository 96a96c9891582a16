// Resume management: upload with text extraction, AI generation (two-stage
// pipeline), AI analysis, primary-flag handling, and version history.
// All LLM calls go through llm_client — the formatter service has its own
// thin reqwest client in formatter.rs.

pub mod analysis;
pub mod formatter;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod upload;
