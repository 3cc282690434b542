//! Axum route handlers for the coaching API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::coach::actions::{catalog, ActionInfo, CannedAction};
use crate::coach::composer::coaching_instruction;
use crate::coach::fallback::ModelTier;
use crate::errors::AppError;
use crate::session::handlers::load_session;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Either a free-form prompt or a canned action. The action wins if both are sent.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub action: Option<CannedAction>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub model: String,
    pub tier: ModelTier,
    pub notice: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/actions
pub async fn handle_list_actions() -> Json<Vec<ActionInfo>> {
    Json(catalog())
}

/// POST /api/v1/sessions/:id/chat
///
/// One generation per session at a time; a second request gets 409. The session
/// lock is only held to read inputs and record turns, never across the model call.
/// On exhaustion the user turn stays in the transcript with no assistant reply.
pub async fn handle_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let handle = load_session(&state, id).await?;
    let _in_flight = handle.begin_generation().ok_or_else(|| {
        AppError::Conflict("A reply is still being generated for this session".to_string())
    })?;

    let (epoch, user_request, instruction, credential) = {
        let mut session = handle.lock().await;

        let user_request = match (request.action, request.prompt) {
            (Some(action), _) => {
                if !(session.has_resume() && session.has_job_description()) {
                    return Err(AppError::Validation(
                        "Upload your resume and paste the job description to use quick actions"
                            .to_string(),
                    ));
                }
                action.prompt().to_string()
            }
            (None, Some(prompt)) if !prompt.trim().is_empty() => prompt,
            _ => {
                return Err(AppError::Validation(
                    "Either `prompt` or `action` is required".to_string(),
                ))
            }
        };

        let credential = state
            .credential_for(&session)
            .ok_or(AppError::MissingCredential)?;

        session.push_user(user_request.clone());
        let instruction = coaching_instruction(session.resume_text(), session.job_description());
        (session.epoch(), user_request, instruction, credential)
    };

    let generation = state
        .engine
        .generate(&instruction, &user_request, &credential)
        .await?;

    info!("Session {id} answered by {}", generation.model);
    {
        let mut session = handle.lock().await;
        if session.epoch() == epoch {
            session.push_assistant(generation.text.clone(), generation.model.clone());
        } else {
            info!("Session {id} was reset during generation; reply not recorded");
        }
    }

    Ok(Json(ChatResponse {
        notice: generation.notice(),
        reply: generation.text,
        model: generation.model,
        tier: generation.tier,
    }))
}
