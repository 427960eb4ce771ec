//! Session and submission storage.
//!
//! The tutor only needs a small key-value style surface keyed by session id.
//! [`MemoryStore`] backs tests and one-shot runs; [`JsonFileStore`] keeps a
//! single JSON document on disk for the CLI.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::model::{ProblemSession, Submission};

/// Record store for problem sessions and their submissions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert_session(&self, session: &ProblemSession) -> Result<()>;

    async fn get_session(&self, id: Uuid) -> Result<Option<ProblemSession>>;

    async fn insert_submission(&self, submission: &Submission) -> Result<()>;

    /// Submissions for one session, oldest first.
    async fn submissions_for(&self, session_id: Uuid) -> Result<Vec<Submission>>;

    /// Most recent sessions, newest first.
    async fn recent_sessions(&self, limit: usize) -> Result<Vec<ProblemSession>>;
}

/// Everything a store holds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Records {
    #[serde(default)]
    sessions: HashMap<Uuid, ProblemSession>,
    #[serde(default)]
    submissions: Vec<Submission>,
}

impl Records {
    fn insert_submission(&mut self, submission: &Submission) -> Result<()> {
        if !self.sessions.contains_key(&submission.session_id) {
            anyhow::bail!(
                "submission {} references unknown session {}",
                submission.id,
                submission.session_id
            );
        }
        self.submissions.push(submission.clone());
        Ok(())
    }

    fn submissions_for(&self, session_id: Uuid) -> Vec<Submission> {
        let mut found: Vec<Submission> = self
            .submissions
            .iter()
            .filter(|s| s.session_id == session_id)
            .cloned()
            .collect();
        found.sort_by_key(|s| s.created_at);
        found
    }

    fn recent_sessions(&self, limit: usize) -> Vec<ProblemSession> {
        let mut sessions: Vec<ProblemSession> = self.sessions.values().cloned().collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sessions.truncate(limit);
        sessions
    }
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Records>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert_session(&self, session: &ProblemSession) -> Result<()> {
        self.records
            .write()
            .await
            .sessions
            .insert(session.id, session.clone());
        Ok(())
    }

    async fn get_session(&self, id: Uuid) -> Result<Option<ProblemSession>> {
        Ok(self.records.read().await.sessions.get(&id).cloned())
    }

    async fn insert_submission(&self, submission: &Submission) -> Result<()> {
        self.records.write().await.insert_submission(submission)
    }

    async fn submissions_for(&self, session_id: Uuid) -> Result<Vec<Submission>> {
        Ok(self.records.read().await.submissions_for(session_id))
    }

    async fn recent_sessions(&self, limit: usize) -> Result<Vec<ProblemSession>> {
        Ok(self.records.read().await.recent_sessions(limit))
    }
}

/// Store backed by one JSON file.
///
/// The whole document is loaded on open and rewritten on every insert
/// through a sibling temp file, so a crash mid-write leaves the previous
/// version intact.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: RwLock<Records>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating an empty one if the file does not
    /// exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            let content = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("failed to read store: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("failed to parse store: {}", path.display()))?
        } else {
            Records::default()
        };

        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, records: &Records) -> Result<()> {
        let json = serde_json::to_string_pretty(records).context("failed to serialize store")?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("failed to write store: {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("failed to replace store: {}", self.path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for JsonFileStore {
    async fn insert_session(&self, session: &ProblemSession) -> Result<()> {
        let mut records = self.records.write().await;
        records.sessions.insert(session.id, session.clone());
        self.persist(&records).await
    }

    async fn get_session(&self, id: Uuid) -> Result<Option<ProblemSession>> {
        Ok(self.records.read().await.sessions.get(&id).cloned())
    }

    async fn insert_submission(&self, submission: &Submission) -> Result<()> {
        let mut records = self.records.write().await;
        records.insert_submission(submission)?;
        self.persist(&records).await
    }

    async fn submissions_for(&self, session_id: Uuid) -> Result<Vec<Submission>> {
        Ok(self.records.read().await.submissions_for(session_id))
    }

    async fn recent_sessions(&self, limit: usize) -> Result<Vec<ProblemSession>> {
        Ok(self.records.read().await.recent_sessions(limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn session_at(text: &str, minutes_ago: i64) -> ProblemSession {
        let mut session = ProblemSession::new(text, 1.0);
        session.created_at = Utc::now() - Duration::minutes(minutes_ago);
        session
    }

    fn submission(session_id: Uuid, answer: f64) -> Submission {
        Submission {
            id: Uuid::new_v4(),
            session_id,
            created_at: Utc::now(),
            user_answer: answer,
            is_correct: answer == 1.0,
            feedback_text: String::new(),
        }
    }

    #[tokio::test]
    async fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        let session = session_at("first", 0);
        store.insert_session(&session).await.unwrap();

        assert_eq!(store.get_session(session.id).await.unwrap(), Some(session.clone()));
        assert_eq!(store.get_session(Uuid::new_v4()).await.unwrap(), None);

        store
            .insert_submission(&submission(session.id, 1.0))
            .await
            .unwrap();
        let subs = store.submissions_for(session.id).await.unwrap();
        assert_eq!(subs.len(), 1);
        assert!(subs[0].is_correct);
    }

    #[tokio::test]
    async fn submission_for_unknown_session_is_rejected() {
        let store = MemoryStore::new();
        let err = store
            .insert_submission(&submission(Uuid::new_v4(), 1.0))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unknown session"));
    }

    #[tokio::test]
    async fn recent_sessions_newest_first() {
        let store = MemoryStore::new();
        for (text, age) in [("old", 30), ("new", 1), ("mid", 10)] {
            store.insert_session(&session_at(text, age)).await.unwrap();
        }
        let recent = store.recent_sessions(2).await.unwrap();
        let texts: Vec<&str> = recent.iter().map(|s| s.problem_text.as_str()).collect();
        assert_eq!(texts, vec!["new", "mid"]);
    }

    #[tokio::test]
    async fn json_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("store.json");

        let session = session_at("persisted", 0);
        {
            let store = JsonFileStore::open(&path).await.unwrap();
            store.insert_session(&session).await.unwrap();
            store
                .insert_submission(&submission(session.id, 2.0))
                .await
                .unwrap();
        }

        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get_session(session.id).await.unwrap(),
            Some(session.clone())
        );
        let subs = reopened.submissions_for(session.id).await.unwrap();
        assert_eq!(subs.len(), 1);
        assert!(!subs[0].is_correct);
    }

    #[tokio::test]
    async fn json_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(JsonFileStore::open(&path).await.is_err());
    }
}
