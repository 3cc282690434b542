use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::ingest::extract_resume_text;
use crate::session::{ChatTurn, ResumeUpdate, SessionHandle};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub has_resume: bool,
    pub resume_chars: usize,
    pub job_description: String,
    pub has_credential: bool,
    /// Canned actions are offered only once both documents are present.
    pub actions_enabled: bool,
    pub next_step: Option<&'static str>,
    pub turns: Vec<ChatTurn>,
}

#[derive(Debug, Serialize)]
pub struct ResumeUploadResponse {
    pub status: ResumeUpdate,
    pub resume_chars: usize,
}

#[derive(Debug, Deserialize)]
pub struct JobDescriptionRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct CredentialRequest {
    pub api_key: String,
}

pub async fn load_session(state: &AppState, id: Uuid) -> Result<SessionHandle, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session_id = state.sessions.create().await;
    info!("Session {session_id} created");
    (StatusCode::CREATED, Json(CreateSessionResponse { session_id }))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = load_session(&state, id).await?;
    let session = handle.lock().await;

    Ok(Json(SessionView {
        session_id: id,
        has_resume: session.has_resume(),
        resume_chars: session.resume_text().chars().count(),
        job_description: session.job_description().to_string(),
        has_credential: state.credential_for(&session).is_some(),
        actions_enabled: session.has_resume() && session.has_job_description(),
        next_step: session.next_step(),
        turns: session.turns().to_vec(),
    }))
}

/// POST /api/v1/sessions/:id/resume (multipart, field `file`)
///
/// A session that already holds a resume ignores the upload without parsing it.
/// The lock is released during extraction; a reset in that window discards the text.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ResumeUploadResponse>, AppError> {
    let handle = load_session(&state, id).await?;

    let epoch = {
        let session = handle.lock().await;
        if session.has_resume() {
            return Ok(Json(ResumeUploadResponse {
                status: ResumeUpdate::AlreadyLoaded,
                resume_chars: session.resume_text().chars().count(),
            }));
        }
        session.epoch()
    };

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
            upload = Some(bytes);
            break;
        }
    }
    let bytes = upload.ok_or_else(|| AppError::Validation("Missing `file` field".to_string()))?;

    let text = extract_resume_text(bytes).await?;

    let mut session = handle.lock().await;
    let status = session.offer_resume_from(epoch, text);
    info!("Session {id} resume upload: {status:?}");

    Ok(Json(ResumeUploadResponse {
        status,
        resume_chars: session.resume_text().chars().count(),
    }))
}

/// PUT /api/v1/sessions/:id/job-description
pub async fn handle_set_job_description(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<JobDescriptionRequest>,
) -> Result<StatusCode, AppError> {
    let handle = load_session(&state, id).await?;
    handle.lock().await.set_job_description(req.text);
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/sessions/:id/credential
pub async fn handle_set_credential(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CredentialRequest>,
) -> Result<StatusCode, AppError> {
    let handle = load_session(&state, id).await?;
    handle.lock().await.set_credential(req.api_key);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let handle = load_session(&state, id).await?;
    handle.lock().await.reset();
    info!("Session {id} reset");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.sessions.remove(id).await {
        return Err(AppError::NotFound(format!("Session {id} not found")));
    }
    info!("Session {id} deleted");
    Ok(StatusCode::NO_CONTENT)
}
