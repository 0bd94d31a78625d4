//! Application State

use std::sync::Arc;

use tokio::sync::Mutex;

use host_core::{Agent, SessionStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Agent bound to the single tool channel
    pub agent: Arc<Agent>,

    /// Where chat threads are checkpointed
    pub store: Arc<dyn SessionStore>,

    /// Serializes turns over the shared channel
    pub turns: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(agent: Arc<Agent>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            agent,
            store,
            turns: Arc::new(Mutex::new(())),
        }
    }
}
