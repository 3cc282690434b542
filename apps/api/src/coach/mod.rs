// Coaching engine: prompt composition, canned actions, and the model-fallback loop.
// All upstream calls go through llm_client::ModelBackend; nothing here talks HTTP.

pub mod actions;
pub mod composer;
pub mod fallback;
pub mod handlers;
pub mod prompts;
