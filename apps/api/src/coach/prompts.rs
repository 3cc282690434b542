// All prompt constants for the coaching module.

/// Role preamble placed at the top of every instruction block.
pub const ROLE_PREAMBLE: &str = "You are an Expert Tech Recruiter and Career Coach.";

/// Behavioral rules appended after the documents, one bullet each.
pub const BEHAVIOR_RULES: &[&str] = &[
    "Answer based ONLY on the documents above.",
    "Be concise, direct, and actionable.",
    "For Cover Letters: Use a professional but modern tone.",
    "For Interview Prep: Focus on hard skills found in the JD.",
];

/// Stands in for an empty job description so the model never sees a blank section.
pub const NO_JD_SENTINEL: &str = "NO JD PROVIDED.";

pub const RESUME_HEADER: &str = "=== CANDIDATE RESUME ===";
pub const JD_HEADER: &str = "=== TARGET JOB DESCRIPTION ===";
pub const INSTRUCTIONS_HEADER: &str = "INSTRUCTIONS:";

/// Separates the composed instruction from the user's request in the merged payload.
pub const USER_REQUEST_MARKER: &str = "USER REQUEST:";

pub const MATCH_SCORE_PROMPT: &str =
    "Compare my resume to the JD. Give a strict 0-10 score, list the gaps, and explain WHY.";

pub const RED_FLAGS_PROMPT: &str = "Roast my resume based on this JD. Be brutal. \
    What keywords am I missing? What experience is weak?";

pub const REWRITE_BULLET_PROMPT: &str = "Pick my weakest bullet point relevant to this job \
    and rewrite it using 'Action-Result' format.";

pub const COVER_LETTER_PROMPT: &str = "Write a tailored cover letter for this job. \
    Use the 'Hook-Story-Close' framework. Use specific facts from my resume. \
    Do not use placeholders like [Company Name] - fill them in.";

pub const INTERVIEW_PREP_PROMPT: &str = "Generate 3 tough behavioral interview questions \
    specific to this JD and my resume. Then provide the ideal 'STAR method' talking points for each.";

pub const COLD_DM_PROMPT: &str = "Write a short, punchy LinkedIn connection note \
    (under 300 chars) to the hiring manager for this role. Mention a specific skill match.";
