//! Prompt Composer: builds the single instruction block sent ahead of every user request.

use crate::coach::prompts::{
    BEHAVIOR_RULES, INSTRUCTIONS_HEADER, JD_HEADER, NO_JD_SENTINEL, RESUME_HEADER, ROLE_PREAMBLE,
};

/// Composes the instruction block: role, resume, job description, rules, in that order.
///
/// Inputs are inserted verbatim. An empty resume stays an empty section; an empty
/// job description is replaced with [`NO_JD_SENTINEL`].
pub fn compose(
    role_preamble: &str,
    resume_text: &str,
    job_description: &str,
    rules: &[&str],
) -> String {
    let jd_section = if job_description.is_empty() {
        NO_JD_SENTINEL
    } else {
        job_description
    };

    let mut out =
        String::with_capacity(role_preamble.len() + resume_text.len() + jd_section.len() + 256);
    out.push_str("ROLE: ");
    out.push_str(role_preamble);
    out.push_str("\n\n");
    out.push_str(RESUME_HEADER);
    out.push('\n');
    out.push_str(resume_text);
    out.push_str("\n\n");
    out.push_str(JD_HEADER);
    out.push('\n');
    out.push_str(jd_section);
    out.push_str("\n\n");
    out.push_str(INSTRUCTIONS_HEADER);
    for rule in rules {
        out.push_str("\n- ");
        out.push_str(rule);
    }
    out
}

/// The instruction used for every coaching turn.
pub fn coaching_instruction(resume_text: &str, job_description: &str) -> String {
    compose(ROLE_PREAMBLE, resume_text, job_description, BEHAVIOR_RULES)
}
