//! In-memory session store owned by the manager

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::entities::OtpSession;

type SessionMap = HashMap<String, OtpSession>;

/// Sessions keyed by session id behind a single async read/write lock
///
/// Multi-step mutations (verify, history append) hold the write guard for
/// the whole step.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<SessionMap>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: OtpSession) {
        self.sessions
            .write()
            .await
            .insert(session.session_id.clone(), session);
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, SessionMap> {
        self.sessions.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, SessionMap> {
        self.sessions.write().await
    }

    /// Remove unverified sessions that expired before `now`
    pub async fn remove_stale(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_stale(now));
        before - sessions.len()
    }
}
