use crate::{Result as SessionErrorResult, SessionError};

use cm_core::ErrorLocation;

use std::collections::HashMap;
use std::panic::Location;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use log::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub user: String,
    pub connected_at: DateTime<Utc>,
}

struct SessionEntry {
    session: Session,
    last_active: Instant,
}

/// Connected sessions by id.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<String, SessionEntry>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, user: &str) -> Session {
        let session = Session {
            id: Uuid::new_v4().to_string(),
            user: user.to_string(),
            connected_at: Utc::now(),
        };
        self.lock().insert(
            session.id.clone(),
            SessionEntry {
                session: session.clone(),
                last_active: Instant::now(),
            },
        );
        session
    }

    /// Look up a session and mark it active.
    #[track_caller]
    pub fn get(&self, session_id: &str) -> SessionErrorResult<Session> {
        let mut sessions = self.lock();
        let entry = sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionError::SessionNotFound {
                session_id: session_id.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;
        entry.last_active = Instant::now();
        Ok(entry.session.clone())
    }

    pub fn remove(&self, session_id: &str) -> Option<Session> {
        self.lock().remove(session_id).map(|entry| entry.session)
    }

    /// Drop sessions idle for at least `max_idle`, except those `keep` accepts.
    ///
    /// `keep` runs without the registry lock held. Returns the number of
    /// sessions removed.
    pub fn reap_idle(&self, max_idle: Duration, keep: impl Fn(&str) -> bool) -> usize {
        let now = Instant::now();
        let idle: Vec<String> = self
            .lock()
            .iter()
            .filter(|(_, entry)| now.saturating_duration_since(entry.last_active) >= max_idle)
            .map(|(id, _)| id.clone())
            .collect();

        let expired: Vec<String> = idle.into_iter().filter(|id| !keep(id)).collect();
        let mut sessions = self.lock();
        let removed = expired
            .iter()
            .filter(|id| sessions.remove(id.as_str()).is_some())
            .count();
        if removed > 0 {
            info!("Reaped {removed} idle sessions");
        }
        removed
    }

    pub fn is_live(&self, session_id: &str) -> bool {
        self.lock().contains_key(session_id)
    }

    pub fn count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }
}
