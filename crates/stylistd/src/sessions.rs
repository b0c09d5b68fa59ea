//! In-memory session store.
//!
//! One `OutfitSession` per user behind its own async mutex. A turn holds the
//! user's lock from classification to the final state update, so two
//! requests for the same user are serialized while different users proceed
//! in parallel. Sessions live for the process lifetime.

use std::collections::HashMap;
use std::sync::Arc;
use stylist_common::{OutfitSession, UserId};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

pub type SessionHandle = Arc<Mutex<OutfitSession>>;

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<UserId, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session for `user_id`, created on first use
    pub async fn get_or_create(&self, user_id: &UserId) -> SessionHandle {
        let key = user_id.normalized();
        if let Some(handle) = self.sessions.read().await.get(&key) {
            return handle.clone();
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(key.clone())
            .or_insert_with(|| {
                debug!("Creating session for user {}", key);
                Arc::new(Mutex::new(OutfitSession::new(key.clone())))
            })
            .clone()
    }

    pub async fn get(&self, user_id: &UserId) -> Option<SessionHandle> {
        self.sessions.read().await.get(&user_id.normalized()).cloned()
    }

    /// Copy of the user's session, if any
    pub async fn snapshot(&self, user_id: &UserId) -> Option<OutfitSession> {
        let handle = self.get(user_id).await?;
        let session = handle.lock().await;
        Some(session.clone())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
