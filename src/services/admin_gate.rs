use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use subtle::ConstantTimeEq;

use crate::utils::token::generate_session_token;

/// Opaque identifier of one admin browser session.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        Self(generate_session_token())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// Session ids are bearer credentials; keep them out of logs.
impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionId(..)")
    }
}

/// Shared-secret gate for the admin surface.
///
/// A session is Authenticated while its id is present in `sessions` and
/// younger than `ttl`; every other id is Unauthenticated.
#[derive(Clone)]
pub struct AdminGate {
    secret: Arc<str>,
    ttl: Duration,
    sessions: Arc<RwLock<HashMap<SessionId, Instant>>>,
}

impl AdminGate {
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret: Arc::from(secret.into()),
            ttl,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Marks `session` authenticated when `submitted` equals the admin secret.
    pub fn authenticate(&self, session: &SessionId, submitted: &str) -> bool {
        let matches: bool = submitted.as_bytes().ct_eq(self.secret.as_bytes()).into();
        if !matches {
            tracing::warn!("admin login rejected");
            return false;
        }

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let ttl = self.ttl;
        sessions.retain(|_, started| started.elapsed() < ttl);
        sessions.insert(session.clone(), Instant::now());
        tracing::info!("admin session authenticated");
        true
    }

    pub fn is_authenticated(&self, session: Option<&SessionId>) -> bool {
        let Some(session) = session else {
            return false;
        };

        let expired = {
            let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
            match sessions.get(session) {
                Some(started) => started.elapsed() >= self.ttl,
                None => return false,
            }
        };

        if expired {
            self.deauthenticate(session);
            tracing::info!("admin session expired");
            return false;
        }
        true
    }

    pub fn deauthenticate(&self, session: &SessionId) {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> AdminGate {
        AdminGate::new("admin123", Duration::from_secs(3600))
    }

    #[test]
    fn session_starts_unauthenticated() {
        let gate = gate();
        let session = SessionId::generate();
        assert!(!gate.is_authenticated(Some(&session)));
        assert!(!gate.is_authenticated(None));
    }

    #[test]
    fn correct_secret_authenticates_only_that_session() {
        let gate = gate();
        let session = SessionId::generate();
        let other = SessionId::generate();

        assert!(gate.authenticate(&session, "admin123"));
        assert!(gate.is_authenticated(Some(&session)));
        assert!(!gate.is_authenticated(Some(&other)));
    }

    #[test]
    fn wrong_secret_leaves_session_unauthenticated() {
        let gate = gate();
        let session = SessionId::generate();

        assert!(!gate.authenticate(&session, "admin12"));
        assert!(!gate.authenticate(&session, "admin1234"));
        assert!(!gate.authenticate(&session, ""));
        assert!(!gate.is_authenticated(Some(&session)));
    }

    #[test]
    fn deauthenticate_always_resets() {
        let gate = gate();
        let session = SessionId::generate();

        gate.deauthenticate(&session);
        assert!(!gate.is_authenticated(Some(&session)));

        assert!(gate.authenticate(&session, "admin123"));
        gate.deauthenticate(&session);
        assert!(!gate.is_authenticated(Some(&session)));
    }

    #[test]
    fn expired_session_reads_as_unauthenticated() {
        let gate = AdminGate::new("admin123", Duration::ZERO);
        let session = SessionId::generate();

        assert!(gate.authenticate(&session, "admin123"));
        assert!(!gate.is_authenticated(Some(&session)));
    }

    #[test]
    fn debug_output_hides_session_id() {
        let session = SessionId::from("secret-token".to_string());
        assert_eq!(format!("{:?}", session), "SessionId(..)");
    }
}
