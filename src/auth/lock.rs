use std::{str::FromStr, time::Duration};

use tokio::sync::{Mutex, MutexGuard};

/// What a writer does when the store lock is not acquired in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockTimeoutPolicy {
    /// Carry on without the lock. Concurrent registers of the same
    /// username can then both succeed.
    #[default]
    ProceedUnlocked,
    /// Give up and answer with a busy response.
    Reject,
}

impl FromStr for LockTimeoutPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "proceed" => Ok(LockTimeoutPolicy::ProceedUnlocked),
            "reject" => Ok(LockTimeoutPolicy::Reject),
            other => Err(format!("unknown policy '{other}', expected proceed|reject")),
        }
    }
}

/// Advisory lock over the whole record sheet. Only writers take it.
pub struct StoreLock {
    mutex: Mutex<()>,
    timeout: Duration,
}

impl StoreLock {
    pub fn new(timeout: Duration) -> Self {
        StoreLock {
            mutex: Mutex::new(()),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Waits up to the configured timeout. `None` means the wait expired.
    pub async fn acquire(&self) -> Option<MutexGuard<'_, ()>> {
        tokio::time::timeout(self.timeout, self.mutex.lock())
            .await
            .ok()
    }
}
