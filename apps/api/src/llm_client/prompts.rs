// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Persona fragment shared by every coaching-flavored call (interview,
/// resume analysis, chat). Keeps the voice consistent across features.
pub const COACH_PERSONA: &str = "You are an experienced career coach and \
    hiring manager. You are direct, specific, and encouraging. You ground \
    every observation in what the candidate actually said or wrote, and you \
    never invent facts about them.";

/// Instruction fragment that pins numeric scores to the 0-100 integer range.
pub const SCORE_RANGE_INSTRUCTION: &str = "\
    All scores are integers between 0 and 100 inclusive. \
    60-74 means adequate, 75-89 means strong, 90+ means exceptional. \
    Do not return scores outside this range.";
