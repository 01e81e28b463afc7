//! Server-side session state for the login gate.
//!
//! A session is identified by an opaque random token stored in the client's
//! private cookie. Sessions live in process memory and disappear on logout,
//! restart, or once they are older than the store's TTL.

use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

pub trait SessionStore: Send + Sync {
    /// Open a new authenticated session and return its token.
    fn authenticate(&self) -> SessionToken;

    fn state(&self, token: &SessionToken) -> SessionState;

    /// Returns whether a session was actually removed.
    fn destroy(&self, token: &SessionToken) -> bool;
}

pub const DEFAULT_SESSION_TTL_HOURS: i64 = 12;

#[derive(Debug, Clone)]
struct Session {
    created_at: DateTime<Utc>,
}

impl Session {
    fn expired(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        now - self.created_at >= ttl
    }
}

pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionToken, Session>>,
    ttl: TimeDelta,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::with_ttl(TimeDelta::hours(DEFAULT_SESSION_TTL_HOURS))
    }
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: TimeDelta) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemorySessionStore {
    fn authenticate(&self) -> SessionToken {
        let token = SessionToken::generate();
        let now = Utc::now();
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, s| !s.expired(now, self.ttl));
        if sessions.len() < before {
            debug!(purged = before - sessions.len(), "expired sessions purged");
        }
        sessions.insert(token.clone(), Session { created_at: now });
        token
    }

    fn state(&self, token: &SessionToken) -> SessionState {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
            match sessions.get(token) {
                None => return SessionState::Anonymous,
                Some(s) if !s.expired(now, self.ttl) => return SessionState::Authenticated,
                Some(_) => {}
            }
        }
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        if sessions.get(token).is_some_and(|s| s.expired(now, self.ttl)) {
            sessions.remove(token);
            debug!("expired session dropped");
        }
        SessionState::Anonymous
    }

    fn destroy(&self, token: &SessionToken) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token);
        match removed {
            Some(session) => {
                let age = Utc::now() - session.created_at;
                debug!(age_secs = age.num_seconds(), "session destroyed");
                true
            }
            None => false,
        }
    }
}
