//! The global advisory lock a session must hold to run migration operations.
//!
//! The lock is cooperative: it expires after the configured hold time and an
//! administrator can take it over with `override_lock`.

use crate::{Result as SessionErrorResult, SessionError};

use cm_core::ErrorLocation;

use std::panic::Location;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockState {
    pub holder_user: String,
    pub holder_session: String,
    pub expires_at: Instant,
}

impl LockState {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    fn remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}

/// Snapshot of the current holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockHolder {
    pub user: String,
    pub session_id: String,
    pub remaining: Duration,
}

pub struct SessionLock {
    state: Mutex<Option<LockState>>,
    hold: Duration,
}

impl SessionLock {
    pub fn new(hold: Duration) -> Self {
        Self {
            state: Mutex::new(None),
            hold,
        }
    }

    pub fn hold(&self) -> Duration {
        self.hold
    }

    /// Take the lock for `session_id`.
    ///
    /// Succeeds when the lock is free, expired, already held by the caller,
    /// or `override_lock` is set. Returns the session displaced by an override.
    #[track_caller]
    pub fn acquire(
        &self,
        session_id: &str,
        user: &str,
        override_lock: bool,
    ) -> SessionErrorResult<Option<String>> {
        let now = Instant::now();
        let mut state = self.lock();
        let mut displaced = None;

        if let Some(current) = state.as_ref() {
            let live = !current.is_expired(now);
            let other = current.holder_session != session_id;
            if live && other {
                if !override_lock {
                    return Err(locked_by_other(current, now));
                }
                warn!(
                    "Lock taken over from {} ({}) by {user}",
                    current.holder_user, current.holder_session
                );
                displaced = Some(current.holder_session.clone());
            }
        }

        *state = Some(LockState {
            holder_user: user.to_string(),
            holder_session: session_id.to_string(),
            expires_at: now + self.hold,
        });
        info!("Lock acquired by {user} ({session_id})");
        Ok(displaced)
    }

    /// Refresh the caller's hold.
    ///
    /// Fails with `LockLost` when nobody holds the lock or the hold expired,
    /// and with `LockedByOther` when another session holds it.
    #[track_caller]
    pub fn extend(&self, session_id: &str) -> SessionErrorResult<Duration> {
        let now = Instant::now();
        let mut state = self.lock();

        let Some(current) = state.as_mut() else {
            return Err(lock_lost());
        };

        if current.is_expired(now) {
            debug!(
                "Lock of {} ({}) expired",
                current.holder_user, current.holder_session
            );
            *state = None;
            return Err(lock_lost());
        }

        if current.holder_session != session_id {
            return Err(locked_by_other(current, now));
        }

        current.expires_at = now + self.hold;
        Ok(self.hold)
    }

    /// Release the lock if `session_id` holds it.
    ///
    /// Returns the live holder's user when someone else holds it.
    pub fn release(&self, session_id: &str) -> Option<String> {
        let now = Instant::now();
        let mut state = self.lock();

        match state.as_ref() {
            Some(current) if current.holder_session == session_id => {
                info!("Lock released by {} ({session_id})", current.holder_user);
                *state = None;
                None
            }
            Some(current) if !current.is_expired(now) => Some(current.holder_user.clone()),
            _ => None,
        }
    }

    /// Free a lock left behind by a dead session of the caller's own user.
    ///
    /// Returns `true` when the lock was released.
    pub fn release_orphan(
        &self,
        session_id: &str,
        user: &str,
        is_live_session: impl Fn(&str) -> bool,
    ) -> bool {
        let now = Instant::now();
        let mut state = self.lock();

        let orphaned = state.as_ref().is_some_and(|current| {
            current.holder_session != session_id
                && current.holder_user == user
                && (current.is_expired(now) || !is_live_session(&current.holder_session))
        });

        if orphaned {
            info!("Released orphaned lock of {user}");
            *state = None;
        }
        orphaned
    }

    /// Whether `session_id` holds a live lock.
    pub fn is_held_by(&self, session_id: &str) -> bool {
        let now = Instant::now();
        self.lock()
            .as_ref()
            .is_some_and(|current| current.holder_session == session_id && !current.is_expired(now))
    }

    pub fn holder(&self) -> Option<LockHolder> {
        let now = Instant::now();
        self.lock()
            .as_ref()
            .filter(|current| !current.is_expired(now))
            .map(|current| LockHolder {
                user: current.holder_user.clone(),
                session_id: current.holder_session.clone(),
                remaining: current.remaining(now),
            })
    }

    fn lock(&self) -> MutexGuard<'_, Option<LockState>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[track_caller]
fn locked_by_other(current: &LockState, now: Instant) -> SessionError {
    SessionError::LockedByOther {
        holder: current.holder_user.clone(),
        remaining_secs: remaining_secs(current.remaining(now)),
        location: ErrorLocation::from(Location::caller()),
    }
}

#[track_caller]
fn lock_lost() -> SessionError {
    SessionError::LockLost {
        location: ErrorLocation::from(Location::caller()),
    }
}

/// Whole seconds left, rounded up so a live lock never reports zero.
pub(crate) fn remaining_secs(remaining: Duration) -> u64 {
    remaining.as_secs_f64().ceil() as u64
}
