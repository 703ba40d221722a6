//! In-memory session store.
//!
//! Each session owns one transcript for its lifetime; nothing is written
//! to disk and everything is dropped with the process. The API mirrors
//! what the UI shell needs: create/list/delete sessions, append turns,
//! snapshot the transcript for replay.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::chat::record::{AssistantPayload, Turn};
use crate::core::errors::ApiError;

const DEFAULT_SESSION_TITLE: &str = "Default Session";
const MAX_TITLE_LEN: usize = 160;
const PREVIEW_LEN: usize = 100;

#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub id: String,
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
    pub turn_count: usize,
    pub preview: String,
}

#[derive(Debug, Clone)]
struct SessionEntry {
    title: String,
    created_at: String,
    updated_at: String,
    transcript: Vec<Turn>,
}

impl SessionEntry {
    fn new(title: String) -> Self {
        let now = now_string();
        SessionEntry {
            title,
            created_at: now.clone(),
            updated_at: now,
            transcript: Vec::new(),
        }
    }

    fn info(&self, id: &str) -> SessionInfo {
        let preview = self
            .transcript
            .last()
            .map(preview_text)
            .unwrap_or_default()
            .chars()
            .take(PREVIEW_LEN)
            .collect();

        SessionInfo {
            id: id.to_string(),
            title: self.title.clone(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
            turn_count: self.transcript.len(),
            preview,
        }
    }
}

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, SessionEntry>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_session(&self, title: Option<String>) -> Result<String, ApiError> {
        let session_id = Uuid::new_v4().to_string();
        let entry = SessionEntry::new(normalize_title(title));

        let mut sessions = self.write()?;
        sessions.insert(session_id.clone(), entry);
        Ok(session_id)
    }

    /// All sessions, most recently updated first.
    pub fn list_sessions(&self) -> Result<Vec<SessionInfo>, ApiError> {
        let sessions = self.read()?;
        let mut infos: Vec<SessionInfo> = sessions
            .iter()
            .map(|(id, entry)| entry.info(id))
            .collect();
        infos.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(infos)
    }

    pub fn get_session(&self, session_id: &str) -> Result<Option<SessionInfo>, ApiError> {
        let sessions = self.read()?;
        Ok(sessions.get(session_id).map(|entry| entry.info(session_id)))
    }

    pub fn delete_session(&self, session_id: &str) -> Result<bool, ApiError> {
        let mut sessions = self.write()?;
        Ok(sessions.remove(session_id).is_some())
    }

    pub fn session_count(&self) -> Result<usize, ApiError> {
        Ok(self.read()?.len())
    }

    pub fn append_user_turn(&self, session_id: &str, text: &str) -> Result<(), ApiError> {
        self.append_turn(
            session_id,
            Turn::User {
                text: text.to_string(),
            },
        )
    }

    pub fn append_assistant_turn(
        &self,
        session_id: &str,
        payload: AssistantPayload,
    ) -> Result<(), ApiError> {
        self.append_turn(session_id, Turn::Assistant { payload })
    }

    /// Snapshot of a session's transcript, or `None` for an unknown id.
    pub fn transcript(&self, session_id: &str) -> Result<Option<Vec<Turn>>, ApiError> {
        let sessions = self.read()?;
        Ok(sessions.get(session_id).map(|entry| entry.transcript.clone()))
    }

    fn append_turn(&self, session_id: &str, turn: Turn) -> Result<(), ApiError> {
        let mut sessions = self.write()?;
        // Appending to an unknown id starts the session, so the shell can
        // talk to "default" without creating it first.
        let entry = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionEntry::new(DEFAULT_SESSION_TITLE.to_string()));
        entry.transcript.push(turn);
        entry.updated_at = now_string();
        Ok(())
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, SessionEntry>>, ApiError> {
        self.inner
            .read()
            .map_err(|_| ApiError::internal("session store lock poisoned"))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, SessionEntry>>, ApiError> {
        self.inner
            .write()
            .map_err(|_| ApiError::internal("session store lock poisoned"))
    }
}

fn preview_text(turn: &Turn) -> String {
    match turn {
        Turn::User { text } => text.clone(),
        Turn::Assistant { payload } => payload.preview_text(),
    }
}

fn now_string() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

fn normalize_title(title: Option<String>) -> String {
    let fallback = || format!("Session {}", Utc::now().format("%Y-%m-%d %H:%M"));

    let Some(raw) = title else {
        return fallback();
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return fallback();
    }

    trimmed.chars().take(MAX_TITLE_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::record::DisplayRecord;

    #[test]
    fn created_session_is_listed_and_deletable() {
        let store = SessionStore::new();
        let id = store.create_session(Some("経費の質問".to_string())).unwrap();

        let sessions = store.list_sessions().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, id);
        assert_eq!(sessions[0].title, "経費の質問");
        assert_eq!(sessions[0].turn_count, 0);
        assert_eq!(sessions[0].preview, "");

        assert!(store.delete_session(&id).unwrap());
        assert!(!store.delete_session(&id).unwrap());
        assert!(store.list_sessions().unwrap().is_empty());
    }

    #[test]
    fn blank_title_gets_a_fallback() {
        let store = SessionStore::new();
        let id = store.create_session(Some("   ".to_string())).unwrap();
        let info = store.get_session(&id).unwrap().unwrap();
        assert!(info.title.starts_with("Session "));
    }

    #[test]
    fn appending_to_unknown_session_starts_it() {
        let store = SessionStore::new();
        store.append_user_turn("default", "こんにちは").unwrap();

        let info = store.get_session("default").unwrap().unwrap();
        assert_eq!(info.title, DEFAULT_SESSION_TITLE);
        assert_eq!(info.turn_count, 1);
        assert_eq!(info.preview, "こんにちは");
    }

    #[test]
    fn transcript_preserves_turn_order_and_is_a_snapshot() {
        let store = SessionStore::new();
        store.append_user_turn("s1", "質問").unwrap();
        store
            .append_assistant_turn("s1", DisplayRecord::plain_answer("回答").into())
            .unwrap();

        let snapshot = store.transcript("s1").unwrap().unwrap();
        assert_eq!(snapshot.len(), 2);
        assert!(matches!(snapshot[0], Turn::User { .. }));
        assert!(matches!(snapshot[1], Turn::Assistant { .. }));

        // Later appends must not show up in an already-taken snapshot.
        store.append_user_turn("s1", "追加の質問").unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(store.transcript("s1").unwrap().unwrap().len(), 3);
    }

    #[test]
    fn unknown_session_transcript_is_none() {
        let store = SessionStore::new();
        assert!(store.transcript("missing").unwrap().is_none());
        assert!(store.get_session("missing").unwrap().is_none());
    }

    #[test]
    fn assistant_preview_uses_record_text() {
        let store = SessionStore::new();
        store
            .append_assistant_turn("s1", DisplayRecord::plain_answer("経費精算の締めは毎月末です。").into())
            .unwrap();
        let info = store.get_session("s1").unwrap().unwrap();
        assert_eq!(info.preview, "経費精算の締めは毎月末です。");
    }
}
