use crate::{EngineError, Result as EngineErrorResult};

use cm_core::ErrorLocation;

use std::panic::Location;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Process-wide lock held for the whole of an import, so no other import or
/// publishing operation can interleave with it.
#[derive(Clone, Default)]
pub struct PublisherLock {
    inner: Arc<Mutex<()>>,
}

impl PublisherLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lock without waiting. Released when the guard drops.
    #[track_caller]
    pub fn try_acquire(&self) -> EngineErrorResult<OwnedMutexGuard<()>> {
        self.inner
            .clone()
            .try_lock_owned()
            .map_err(|_| EngineError::PublisherLockUnavailable {
                location: ErrorLocation::from(Location::caller()),
            })
    }

    pub fn is_held(&self) -> bool {
        self.inner.try_lock().is_err()
    }
}
