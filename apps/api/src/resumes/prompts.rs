// All LLM prompt constants for the resume module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for resume generation — plain text out, no JSON.
pub const GENERATION_SYSTEM: &str = "You are an expert resume writer. \
    You write complete, ready-to-send resumes as plain text. \
    Use ONLY the facts provided in the candidate profile — never invent \
    employers, dates, degrees, or accomplishments. \
    Do NOT use markdown formatting. \
    Do NOT include commentary before or after the resume.";

/// Resume generation prompt template.
/// Replace: {profile_json}, {target_role}, {template_guidance}.
pub const GENERATION_TEMPLATE: &str = r#"Write a complete resume for a candidate targeting the role: {target_role}.

CANDIDATE PROFILE (source of truth — use ONLY these facts):
{profile_json}

STYLE:
{template_guidance}

Requirements:
- 800 to 1200 words of plain text.
- Standard sections: summary, skills, experience, education. Omit a section only if the profile has nothing for it.
- Tailor emphasis and wording to the target role.
- Every claim must come from the profile above."#;

/// System prompt for resume analysis — enforces JSON-only output.
pub const ANALYSIS_SYSTEM: &str = "You are an expert resume reviewer and \
    former technical recruiter. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Resume analysis prompt template. Replace `{resume_text}`.
pub const ANALYSIS_TEMPLATE: &str = r#"Analyze the following resume as a recruiter screening for a technical role.

Return a JSON object with this EXACT schema (no extra fields):
{
  "score": 72,
  "strengths": ["...", "..."],
  "improvements": ["...", "..."],
  "keywords": ["...", "..."]
}

Rules:
- `score` is an integer 0-100 measuring overall hireability signal.
- `strengths` and `improvements`: 2-4 short, specific bullet strings each.
- `keywords`: the technical skills and tools the resume actually evidences.

RESUME:
{resume_text}"#;
