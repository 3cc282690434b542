use anyhow::{Context, Result};

use crate::session::DEFAULT_SESSION_TTL_SECS;

const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Application configuration loaded from environment variables.
/// Nothing is required: without `GOOGLE_API_KEY` users supply their own key per session.
#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment-level credential. Takes precedence over any key entered in a session.
    pub google_api_key: Option<String>,
    pub gemini_api_url: String,
    pub llm_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
    /// Sessions idle for longer than this are evicted.
    pub session_ttl_secs: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` passes the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            google_api_key: lookup("GOOGLE_API_KEY").filter(|k| !k.trim().is_empty()),
            gemini_api_url: lookup("GEMINI_API_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            llm_timeout_secs: lookup("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|| "120".to_string())
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            session_ttl_secs: match lookup("SESSION_TTL_SECS") {
                Some(raw) => raw
                    .parse::<u32>()
                    .context("SESSION_TTL_SECS must be a whole number of seconds")?,
                None => DEFAULT_SESSION_TTL_SECS,
            },
        })
    }
}
