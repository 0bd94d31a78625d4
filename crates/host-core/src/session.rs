//! Session Management
//!
//! A session is a thread-identified conversation that can be persisted and
//! resumed across user turns.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::Result;
use crate::message::{ConversationState, ThreadId};
use crate::reasoning::Checkpoint;

/// Session metadata
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Session title (auto-generated or user-set)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Model used for this session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Extra key-value metadata
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Persisted snapshot of one thread
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Thread identifier
    pub id: ThreadId,

    /// Conversation history
    pub conversation: ConversationState,

    /// Session metadata
    #[serde(default)]
    pub metadata: SessionMetadata,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last activity timestamp
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create an empty session for `id`
    pub fn new(id: ThreadId) -> Self {
        let now = Utc::now();
        Self {
            conversation: ConversationState::new(id.clone()),
            id,
            metadata: SessionMetadata::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the activity timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Set session title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.metadata.title = Some(title.into());
        self.touch();
    }

    /// Get or generate title
    pub fn title(&self) -> String {
        self.metadata.title.clone().unwrap_or_else(|| {
            self.conversation.first_user_text().map_or_else(
                || format!("Session {}", self.id),
                |text| {
                    let preview: String = text.trim().chars().take(50).collect();
                    if text.trim().chars().count() > 50 {
                        format!("{preview}...")
                    } else {
                        preview
                    }
                },
            )
        })
    }

    /// Message count
    pub fn message_count(&self) -> usize {
        self.conversation.len()
    }

    /// Same session header with a newer conversation
    pub fn with_conversation(&self, conversation: &ConversationState) -> Self {
        Self {
            id: self.id.clone(),
            conversation: conversation.clone(),
            metadata: self.metadata.clone(),
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }
}

/// Session store trait for persistence
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the full session for a thread
    async fn load(&self, id: &ThreadId) -> Result<Option<Session>>;

    /// Replace the stored session
    async fn save(&self, session: &Session) -> Result<()>;

    /// Delete a session
    async fn delete(&self, id: &ThreadId) -> Result<()>;

    /// Most recently updated sessions first
    async fn list(&self, limit: usize) -> Result<Vec<Session>>;
}

/// Checkpoint that writes the session snapshot to a store
pub struct StoreCheckpoint<'a> {
    store: &'a dyn SessionStore,
    header: Session,
}

impl<'a> StoreCheckpoint<'a> {
    pub fn new(store: &'a dyn SessionStore, session: &Session) -> Self {
        Self {
            store,
            header: Session {
                id: session.id.clone(),
                conversation: ConversationState::new(session.id.clone()),
                metadata: session.metadata.clone(),
                created_at: session.created_at,
                updated_at: session.updated_at,
            },
        }
    }
}

#[async_trait]
impl<'a> Checkpoint for StoreCheckpoint<'a> {
    async fn checkpoint(&self, state: &ConversationState) -> Result<()> {
        self.store.save(&self.header.with_conversation(state)).await
    }
}

/// In-memory session store (for development/testing)
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<ThreadId, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &ThreadId) -> Result<Option<Session>> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn save(&self, session: &Session) -> Result<()> {
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn delete(&self, id: &ThreadId) -> Result<()> {
        self.sessions.write().await.remove(id);
        Ok(())
    }

    async fn list(&self, limit: usize) -> Result<Vec<Session>> {
        let mut result: Vec<_> = self.sessions.read().await.values().cloned().collect();
        result.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        result.truncate(limit);
        Ok(result)
    }
}
