//! Fallback Generation Engine: walks a fixed model priority list and returns the
//! first model that answers.
//!
//! Policy:
//! - Order is fixed: fastest/cheapest first, high-quota last resort at the end.
//! - First success wins. There is no "best answer" selection.
//! - Rate-limit and not-found failures are expected and skipped silently.
//! - Any other failure is remembered as `last_error` and the walk continues anyway.
//! - Each model is tried at most once per call, with no delay between attempts.
//! - Nothing is remembered between calls; every call starts again from the top.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::coach::prompts::USER_REQUEST_MARKER;
use crate::llm_client::{LlmError, ModelBackend};

/// Model priority list, fastest/cheapest first.
pub const MODEL_PRIORITY: &[&str] = &[
    "gemini-2.0-flash",
    "gemini-2.0-flash-lite",
    "gemini-2.5-flash",
    "gemini-1.5-flash",
];

const RATE_LIMIT_MARKERS: &[&str] = &["resource_exhausted", "quota", "rate limit"];
const NOT_FOUND_MARKERS: &[&str] = &["not_found", "not found"];

/// Status codes that count only as standalone words inside an error message.
const RATE_LIMIT_CODE: &str = "429";
const NOT_FOUND_CODE: &str = "404";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Which slot of the priority list served a request. Shown to the user as a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelTier {
    Fast,
    Backup,
    HighCapability,
    LastResort,
}

impl ModelTier {
    /// Tier for a zero-based position in the priority list.
    pub fn for_position(position: usize) -> Self {
        match position {
            0 => ModelTier::Fast,
            1 => ModelTier::Backup,
            2 => ModelTier::HighCapability,
            _ => ModelTier::LastResort,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ModelTier::Fast => "fast model",
            ModelTier::Backup => "backup model",
            ModelTier::HighCapability => "high-capability model",
            ModelTier::LastResort => "high-quota fallback model",
        }
    }
}

/// A successful generation and the model that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    pub model: String,
    pub tier: ModelTier,
}

impl Generation {
    /// One-line notification naming who answered.
    pub fn notice(&self) -> String {
        format!("Answered by the {} ({})", self.tier.label(), self.model)
    }
}

#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("{}", exhausted_message(.attempts, .last_error))]
    AllModelsExhausted {
        attempts: usize,
        last_error: Option<LlmError>,
    },
}

fn exhausted_message(attempts: &usize, last_error: &Option<LlmError>) -> String {
    match last_error {
        Some(e) => format!("All {attempts} models failed. Last error: {e}"),
        None => "All models are rate-limited or unavailable right now. \
            Please try again in a minute."
            .to_string(),
    }
}

/// How a single failed attempt is treated by the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    RateLimited,
    ModelNotFound,
    Other,
}

impl FailureKind {
    pub fn is_transient(self) -> bool {
        !matches!(self, FailureKind::Other)
    }
}

/// Classifies an upstream failure by HTTP status first, then by message markers.
///
/// Only API error bodies are inspected. Transport, parse, blocked and empty-content
/// failures are always `Other`, so their text (which may carry a URL) never hides them.
pub fn classify(err: &LlmError) -> FailureKind {
    let LlmError::Api { status, message } = err else {
        return FailureKind::Other;
    };
    match status {
        429 => return FailureKind::RateLimited,
        404 => return FailureKind::ModelNotFound,
        _ => {}
    }

    let message = message.to_lowercase();
    if RATE_LIMIT_MARKERS.iter().any(|m| message.contains(m))
        || has_word(&message, RATE_LIMIT_CODE)
    {
        FailureKind::RateLimited
    } else if NOT_FOUND_MARKERS.iter().any(|m| message.contains(m))
        || has_word(&message, NOT_FOUND_CODE)
    {
        FailureKind::ModelNotFound
    } else {
        FailureKind::Other
    }
}

fn has_word(message: &str, word: &str) -> bool {
    message
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|token| token == word)
}

/// Instruction and request always travel as one block, never as a separate system field.
pub fn merge_payload(instruction: &str, user_request: &str) -> String {
    format!("{instruction}\n\n{USER_REQUEST_MARKER} {user_request}")
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct FallbackEngine {
    backend: Arc<dyn ModelBackend>,
    models: Vec<String>,
}

impl FallbackEngine {
    /// Engine over the production [`MODEL_PRIORITY`] list.
    pub fn new(backend: Arc<dyn ModelBackend>) -> Self {
        Self::with_models(backend, MODEL_PRIORITY.iter().map(|m| m.to_string()).collect())
    }

    pub fn with_models(backend: Arc<dyn ModelBackend>, models: Vec<String>) -> Self {
        Self { backend, models }
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Runs one request down the priority list.
    pub async fn generate(
        &self,
        instruction: &str,
        user_request: &str,
        credential: &str,
    ) -> Result<Generation, FallbackError> {
        let payload = merge_payload(instruction, user_request);
        let mut last_error: Option<LlmError> = None;

        for (position, model) in self.models.iter().enumerate() {
            match self.backend.generate(model, &payload, credential).await {
                Ok(text) => {
                    let tier = ModelTier::for_position(position);
                    info!("Generation served by {model} ({tier:?}) after {} attempt(s)", position + 1);
                    return Ok(Generation {
                        text,
                        model: model.clone(),
                        tier,
                    });
                }
                Err(e) => match classify(&e) {
                    kind if kind.is_transient() => {
                        debug!("Model {model} skipped ({kind:?}): {e}");
                    }
                    _ => {
                        warn!("Model {model} failed: {e}");
                        last_error = Some(e);
                    }
                },
            }
        }

        Err(FallbackError::AllModelsExhausted {
            attempts: self.models.len(),
            last_error,
        })
    }
}
