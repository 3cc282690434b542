//! Canned actions: the fixed catalog of one-click requests the UI offers once both
//! documents are loaded. Each maps to exactly one literal user request.

use serde::{Deserialize, Serialize};

use crate::coach::prompts::{
    COLD_DM_PROMPT, COVER_LETTER_PROMPT, INTERVIEW_PREP_PROMPT, MATCH_SCORE_PROMPT,
    RED_FLAGS_PROMPT, REWRITE_BULLET_PROMPT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CannedAction {
    MatchScore,
    RedFlags,
    RewriteBullet,
    CoverLetter,
    InterviewPrep,
    ColdDm,
}

/// Catalog entry as served to the UI.
#[derive(Debug, Clone, Serialize)]
pub struct ActionInfo {
    pub action: CannedAction,
    pub label: &'static str,
    pub prompt: &'static str,
}

impl CannedAction {
    /// Display order: analysis tools first, then creation tools.
    pub const ALL: [CannedAction; 6] = [
        CannedAction::MatchScore,
        CannedAction::RedFlags,
        CannedAction::RewriteBullet,
        CannedAction::CoverLetter,
        CannedAction::InterviewPrep,
        CannedAction::ColdDm,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CannedAction::MatchScore => "Match Score",
            CannedAction::RedFlags => "Find Red Flags",
            CannedAction::RewriteBullet => "Rewrite Bullet",
            CannedAction::CoverLetter => "Draft Cover Letter",
            CannedAction::InterviewPrep => "Interview Prep",
            CannedAction::ColdDm => "Cold DM (LinkedIn)",
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            CannedAction::MatchScore => MATCH_SCORE_PROMPT,
            CannedAction::RedFlags => RED_FLAGS_PROMPT,
            CannedAction::RewriteBullet => REWRITE_BULLET_PROMPT,
            CannedAction::CoverLetter => COVER_LETTER_PROMPT,
            CannedAction::InterviewPrep => INTERVIEW_PREP_PROMPT,
            CannedAction::ColdDm => COLD_DM_PROMPT,
        }
    }

    pub fn info(self) -> ActionInfo {
        ActionInfo {
            action: self,
            label: self.label(),
            prompt: self.prompt(),
        }
    }
}

pub fn catalog() -> Vec<ActionInfo> {
    CannedAction::ALL.iter().map(|a| a.info()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_action_serde_snake_case() {
        let action: CannedAction = serde_json::from_str(r#""cold_dm""#).unwrap();
        assert_eq!(action, CannedAction::ColdDm);
        assert_eq!(
            serde_json::to_string(&CannedAction::InterviewPrep).unwrap(),
            r#""interview_prep""#
        );
    }

    #[test]
    fn test_unknown_action_rejected() {
        assert!(serde_json::from_str::<CannedAction>(r#""salary_negotiation""#).is_err());
    }

    #[test]
    fn test_catalog_prompts_are_distinct() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 6);
        let prompts: HashSet<_> = catalog.iter().map(|a| a.prompt).collect();
        assert_eq!(prompts.len(), 6);
    }

    #[test]
    fn test_match_score_prompt_asks_for_strict_score() {
        assert!(CannedAction::MatchScore.prompt().contains("0-10 score"));
    }
}
