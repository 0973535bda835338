//! Listener Registry
//!
//! Approximate count of concurrent listeners, fed by client heartbeats.
//! Each operation sweeps sessions that have not renewed within the timeout
//! before answering, under a single lock.
//!
//! Counts are per process: several server instances each see only their own
//! listeners.

use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default staleness window (60 seconds)
pub const DEFAULT_LISTENER_TIMEOUT_SECS: u64 = 60;

/// Session table: session id -> last heartbeat
#[derive(Debug)]
pub struct ListenerRegistry {
    sessions: Mutex<HashMap<String, Instant>>,
    timeout: Duration,
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_LISTENER_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Register or renew a session, returns the listener count
    pub fn heartbeat(&self, session_id: &str) -> Result<usize> {
        self.heartbeat_at(session_id, Instant::now())
    }

    /// [`heartbeat`](Self::heartbeat) at an explicit instant
    pub fn heartbeat_at(&self, session_id: &str, now: Instant) -> Result<usize> {
        if session_id.is_empty() {
            return Err(Error::BadRequest);
        }

        let mut sessions = self.sessions.lock();
        let last = sessions.entry(session_id.to_string()).or_insert(now);
        *last = (*last).max(now);
        self.sweep(&mut sessions, now);
        Ok(sessions.len())
    }

    /// Forget a session (unknown or missing ids are fine), returns the count
    pub fn remove(&self, session_id: Option<&str>) -> usize {
        self.remove_at(session_id, Instant::now())
    }

    pub fn remove_at(&self, session_id: Option<&str>, now: Instant) -> usize {
        let mut sessions = self.sessions.lock();
        if let Some(id) = session_id.filter(|id| !id.is_empty()) {
            if sessions.remove(id).is_some() {
                debug!(session = %id, "Listener removed");
            }
        }
        self.sweep(&mut sessions, now);
        sessions.len()
    }

    /// Current listener count
    pub fn count(&self) -> usize {
        self.count_at(Instant::now())
    }

    pub fn count_at(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.lock();
        self.sweep(&mut sessions, now);
        sessions.len()
    }

    fn sweep(&self, sessions: &mut HashMap<String, Instant>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, last| now.saturating_duration_since(*last) <= self.timeout);
        let expired = before - sessions.len();
        if expired > 0 {
            debug!(expired, remaining = sessions.len(), "Stale listeners swept");
        }
    }
}
