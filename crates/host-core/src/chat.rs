//! Chat Sessions
//!
//! Multi-turn driver: owns one thread's session snapshot, restores it from a
//! store on open, and checkpoints it after every completed loop iteration.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::Result;
use crate::message::{ConversationState, ThreadId};
use crate::reasoning::{Agent, Checkpoint, TurnOutcome};
use crate::session::{Session, SessionStore, StoreCheckpoint};

pub struct ChatSession {
    agent: Arc<Agent>,
    session: Session,
    store: Option<Arc<dyn SessionStore>>,
}

impl ChatSession {
    /// Resume `thread_id` from the store, or start it empty
    pub async fn open(
        agent: Arc<Agent>,
        store: Option<Arc<dyn SessionStore>>,
        thread_id: ThreadId,
    ) -> Result<Self> {
        let restored = match &store {
            Some(store) => store.load(&thread_id).await?,
            None => None,
        };

        let session = match restored {
            Some(session) => {
                info!(
                    thread_id = %thread_id,
                    messages = session.message_count(),
                    "restored session"
                );
                session
            }
            None => {
                let mut session = Session::new(thread_id);
                session.metadata.model = Some(agent.config().generation.model.clone());
                session
            }
        };

        Ok(Self {
            agent,
            session,
            store,
        })
    }

    /// Session without persistence
    pub fn ephemeral(agent: Arc<Agent>) -> Self {
        Self {
            agent,
            session: Session::new(ThreadId::new()),
            store: None,
        }
    }

    /// Run one user turn on this thread
    pub async fn send(&mut self, input: &str, cancel: &CancellationToken) -> Result<TurnOutcome> {
        let Self {
            agent,
            session,
            store,
        } = self;

        let checkpoint = store
            .as_deref()
            .map(|store| StoreCheckpoint::new(store, &*session));
        let result = agent
            .run_turn(
                &mut session.conversation,
                input,
                cancel,
                checkpoint.as_ref().map(|c| c as &dyn Checkpoint),
            )
            .await;
        session.touch();

        // Successful turns were checkpointed at DONE; keep partial turns too
        if result.is_err() {
            if let Some(store) = store.as_deref() {
                if let Err(e) = store.save(session).await {
                    warn!(thread_id = %session.id, error = %e, "failed to persist partial turn");
                }
            }
        }

        result
    }

    pub const fn thread_id(&self) -> &ThreadId {
        &self.session.id
    }

    pub const fn state(&self) -> &ConversationState {
        &self.session.conversation
    }

    pub const fn session(&self) -> &Session {
        &self.session
    }
}
