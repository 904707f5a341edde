use crate::{ConfigError, ConfigErrorResult, DEFAULT_LOCK_HOLD_SECS, MAX_LOCK_HOLD_SECS};

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// How long an administrative session may hold the migration lock
    /// without extending it
    pub hold_secs: u64,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            hold_secs: DEFAULT_LOCK_HOLD_SECS,
        }
    }
}

impl LockConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.hold_secs == 0 || self.hold_secs > MAX_LOCK_HOLD_SECS {
            return Err(ConfigError::lock(format!(
                "lock.hold_secs must be 1-{}, got {}",
                MAX_LOCK_HOLD_SECS, self.hold_secs
            )));
        }

        Ok(())
    }

    pub fn hold_duration(&self) -> Duration {
        Duration::from_secs(self.hold_secs)
    }
}
