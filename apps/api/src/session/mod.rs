//! Sessions: one user's ephemeral workspace (transcript, documents, credential).
//!
//! Lives only in memory. A process restart loses every session.

pub mod handlers;
pub mod ingest;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// A single transcript entry. Assistant turns carry the model that produced them.
#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Result of offering a resume to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeUpdate {
    Stored,
    AlreadyLoaded,
    /// The session was reset while the file was being read.
    Discarded,
}

#[derive(Debug, Default)]
pub struct Session {
    turns: Vec<ChatTurn>,
    resume_text: String,
    job_description: String,
    credential: Option<String>,
    /// Bumped on every reset; lets work started before a reset notice it.
    epoch: u64,
}

impl Session {
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn has_resume(&self) -> bool {
        !self.resume_text.is_empty()
    }

    pub fn has_job_description(&self) -> bool {
        !self.job_description.is_empty()
    }

    /// Write-once until reset: a loaded resume is never replaced.
    pub fn offer_resume(&mut self, text: String) -> ResumeUpdate {
        if self.has_resume() {
            return ResumeUpdate::AlreadyLoaded;
        }
        self.resume_text = text;
        ResumeUpdate::Stored
    }

    /// Like [`Session::offer_resume`], for text read before the lock was retaken.
    /// Dropped if the session was reset in between.
    pub fn offer_resume_from(&mut self, epoch: u64, text: String) -> ResumeUpdate {
        if epoch != self.epoch {
            return ResumeUpdate::Discarded;
        }
        self.offer_resume(text)
    }

    pub fn set_job_description(&mut self, text: String) {
        self.job_description = text;
    }

    /// Stores a user-entered key. Blank input clears it.
    pub fn set_credential(&mut self, key: String) {
        let key = key.trim().to_string();
        self.credential = if key.is_empty() { None } else { Some(key) };
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(ChatTurn {
            role: Role::User,
            content: content.into(),
            model: None,
            created_at: Utc::now(),
        });
    }

    pub fn push_assistant(&mut self, content: impl Into<String>, model: impl Into<String>) {
        self.turns.push(ChatTurn {
            role: Role::Assistant,
            content: content.into(),
            model: Some(model.into()),
            created_at: Utc::now(),
        });
    }

    /// Hint for the UI about what the user should do next, if anything.
    pub fn next_step(&self) -> Option<&'static str> {
        if !self.has_resume() {
            Some("Upload your resume PDF.")
        } else if !self.has_job_description() {
            Some("Paste the job description.")
        } else {
            None
        }
    }

    /// Discards the transcript, both documents and the credential.
    pub fn reset(&mut self) {
        *self = Session {
            epoch: self.epoch + 1,
            ..Session::default()
        };
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Store
// ────────────────────────────────────────────────────────────────────────────

/// Sessions idle longer than this are dropped from the store.
pub const DEFAULT_SESSION_TTL_SECS: u32 = 60 * 60;

/// One stored session: its state plus an in-flight marker for generation.
///
/// The marker lives outside the mutex so a long model call never blocks readers.
#[derive(Debug, Default)]
pub struct SharedSession {
    state: Mutex<Session>,
    generating: AtomicBool,
}

impl SharedSession {
    pub async fn lock(&self) -> MutexGuard<'_, Session> {
        self.state.lock().await
    }

    /// Claims the session for one generation. `None` if another one is running.
    pub fn begin_generation(&self) -> Option<GenerationGuard<'_>> {
        self.generating
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GenerationGuard { flag: &self.generating })
    }

    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::Acquire)
    }
}

/// Releases the in-flight marker on drop, including when the request is cancelled.
pub struct GenerationGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for GenerationGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub type SessionHandle = Arc<SharedSession>;

struct StoreEntry {
    session: SessionHandle,
    last_seen: DateTime<Utc>,
}

/// In-memory session map. Entries idle past the TTL are evicted whenever a new
/// session is created.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, StoreEntry>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(Duration::seconds(i64::from(DEFAULT_SESSION_TTL_SECS)))
    }
}

impl SessionStore {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn create(&self) -> Uuid {
        let now = Utc::now();
        self.evict_idle(now).await;

        let id = Uuid::new_v4();
        self.inner.write().await.insert(
            id,
            StoreEntry {
                session: Arc::new(SharedSession::default()),
                last_seen: now,
            },
        );
        id
    }

    /// Looks a session up and marks it as seen.
    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        let mut inner = self.inner.write().await;
        let entry = inner.get_mut(&id)?;
        entry.last_seen = Utc::now();
        Some(entry.session.clone())
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }

    /// Drops sessions not seen within the TTL as of `now`. A session with a
    /// generation in flight is kept. Returns how many were dropped.
    pub async fn evict_idle(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now - self.ttl;
        let mut inner = self.inner.write().await;
        let before = inner.len();
        inner.retain(|_, entry| entry.last_seen > cutoff || entry.session.is_generating());
        let evicted = before - inner.len();
        if evicted > 0 {
            info!("Evicted {evicted} idle session(s)");
        }
        evicted
    }

    pub async fn count(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_is_write_once() {
        let mut session = Session::default();
        assert_eq!(session.offer_resume("first".to_string()), ResumeUpdate::Stored);
        assert_eq!(
            session.offer_resume("second".to_string()),
            ResumeUpdate::AlreadyLoaded
        );
        assert_eq!(session.resume_text(), "first");
    }

    #[test]
    fn test_empty_extraction_does_not_lock_resume() {
        let mut session = Session::default();
        assert_eq!(session.offer_resume(String::new()), ResumeUpdate::Stored);
        assert_eq!(session.offer_resume("real".to_string()), ResumeUpdate::Stored);
        assert_eq!(session.resume_text(), "real");
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = Session::default();
        session.offer_resume("resume".to_string());
        session.set_job_description("jd".to_string());
        session.set_credential("key".to_string());
        session.push_user("hi");
        session.push_assistant("hello", "gemini-2.0-flash");

        session.reset();

        assert!(session.turns().is_empty());
        assert_eq!(session.resume_text(), "");
        assert_eq!(session.job_description(), "");
        assert!(session.credential().is_none());
    }

    #[test]
    fn test_turns_are_appended_in_order() {
        let mut session = Session::default();
        session.push_user("question");
        session.push_assistant("answer", "B");
        let turns = session.turns();
        assert_eq!(turns[0].role, Role::User);
        assert!(turns[0].model.is_none());
        assert_eq!(turns[1].role, Role::Assistant);
        assert_eq!(turns[1].model.as_deref(), Some("B"));
    }

    #[test]
    fn test_blank_credential_clears() {
        let mut session = Session::default();
        session.set_credential(" key ".to_string());
        assert_eq!(session.credential(), Some("key"));
        session.set_credential("   ".to_string());
        assert!(session.credential().is_none());
    }

    #[test]
    fn test_next_step_progression() {
        let mut session = Session::default();
        assert_eq!(session.next_step(), Some("Upload your resume PDF."));
        session.offer_resume("resume".to_string());
        assert_eq!(session.next_step(), Some("Paste the job description."));
        session.set_job_description("jd".to_string());
        assert_eq!(session.next_step(), None);
    }

    #[tokio::test]
    async fn test_store_create_and_get() {
        let store = SessionStore::default();
        let id = store.create().await;
        assert_eq!(store.count().await, 1);
        assert!(store.get(id).await.is_some());
        assert!(store.get(Uuid::new_v4()).await.is_none());
    }

    #[test]
    fn test_reset_bumps_epoch_and_discards_stale_resume() {
        let mut session = Session::default();
        let before = session.epoch();
        session.reset();
        assert_eq!(session.epoch(), before + 1);

        assert_eq!(
            session.offer_resume_from(before, "stale".to_string()),
            ResumeUpdate::Discarded
        );
        assert_eq!(session.resume_text(), "");
        assert_eq!(
            session.offer_resume_from(session.epoch(), "fresh".to_string()),
            ResumeUpdate::Stored
        );
        assert_eq!(session.resume_text(), "fresh");
    }

    #[tokio::test]
    async fn test_removed_sessions_leave_the_store() {
        let store = SessionStore::default();
        for _ in 0..1000 {
            let id = store.create().await;
            assert!(store.remove(id).await);
        }
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_idle_sessions_are_evicted() {
        let store = SessionStore::with_ttl(Duration::minutes(30));
        let idle = store.create().await;
        let active = store.create().await;

        let later = Utc::now() + Duration::minutes(31);
        let handle = store.get(active).await.unwrap();
        let _guard = handle.begin_generation().unwrap();

        assert_eq!(store.evict_idle(later).await, 1);
        assert!(store.get(idle).await.is_none());
        assert!(store.get(active).await.is_some());
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_recently_seen_sessions_survive_eviction() {
        let store = SessionStore::with_ttl(Duration::minutes(30));
        let id = store.create().await;
        assert_eq!(store.evict_idle(Utc::now() + Duration::minutes(29)).await, 0);
        assert!(store.get(id).await.is_some());
    }

    #[test]
    fn test_only_one_generation_at_a_time() {
        let shared = SharedSession::default();
        let guard = shared.begin_generation().unwrap();
        assert!(shared.is_generating());
        assert!(shared.begin_generation().is_none());
        drop(guard);
        assert!(!shared.is_generating());
        assert!(shared.begin_generation().is_some());
    }
}
