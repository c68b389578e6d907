//! In-memory session gate.
//!
//! A session exists only after a successful OTP check; its id travels in an
//! HttpOnly cookie and maps to a verified flag plus a last-activity instant.
//! Expiry is lazy: an expired record is dropped at the next authorization
//! check, so the timeout is inactivity-based rather than absolute.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use actix_web::cookie::{Cookie, SameSite};
use actix_web::HttpRequest;
use uuid::Uuid;

use crate::constants::SESSION_COOKIE;

struct Session {
    verified: bool,
    last_activity: Instant,
}

/// Gate in front of every file route.
pub struct SessionGate {
    sessions: Mutex<HashMap<String, Session>>,
    timeout: Duration,
}

impl SessionGate {
    pub fn new(timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            timeout,
        }
    }

    /// Create a verified session and return its id. Only called after the
    /// OTP authority accepted a code.
    pub fn create_verified(&self) -> String {
        let id = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.lock().unwrap();
        sessions.insert(
            id.clone(),
            Session {
                verified: true,
                last_activity: Instant::now(),
            },
        );
        id
    }

    /// True only for a verified session inside its inactivity window. A
    /// passing check refreshes the window; an expired record is removed.
    pub fn is_authorized(&self, id: &str) -> bool {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.get_mut(id) {
            Some(session) if session.verified => {
                if session.last_activity.elapsed() > self.timeout {
                    sessions.remove(id);
                    return false;
                }
                session.last_activity = Instant::now();
                true
            }
            _ => false,
        }
    }

    /// Explicit logout.
    pub fn clear(&self, id: &str) {
        self.sessions.lock().unwrap().remove(id);
    }
}

/// Session id from the request cookie, if any.
pub fn session_id(req: &HttpRequest) -> Option<String> {
    req.cookie(SESSION_COOKIE).map(|c| c.value().to_string())
}

/// Cookie carrying a freshly created session id.
pub fn session_cookie(id: &str) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, id.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

/// Removal cookie for logout.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_session_is_unauthorized() {
        let gate = SessionGate::new(Duration::from_secs(60));
        assert!(!gate.is_authorized("no-such-session"));
    }

    #[test]
    fn test_verified_session_is_authorized() {
        let gate = SessionGate::new(Duration::from_secs(60));
        let id = gate.create_verified();
        assert!(gate.is_authorized(&id));
        assert!(gate.is_authorized(&id), "Touch must not consume the session");
    }

    #[test]
    fn test_clear_logs_out() {
        let gate = SessionGate::new(Duration::from_secs(60));
        let id = gate.create_verified();
        gate.clear(&id);
        assert!(!gate.is_authorized(&id));
    }

    #[test]
    fn test_inactivity_expires_session() {
        let gate = SessionGate::new(Duration::from_millis(20));
        let id = gate.create_verified();
        assert!(gate.is_authorized(&id));

        std::thread::sleep(Duration::from_millis(40));
        assert!(!gate.is_authorized(&id), "Idle session must expire");
        // Lazy expiry removed the record, so it stays unauthorized
        assert!(!gate.is_authorized(&id));
    }

    #[test]
    fn test_activity_keeps_session_alive() {
        let gate = SessionGate::new(Duration::from_millis(60));
        let id = gate.create_verified();

        // Keep touching inside the window; total elapsed exceeds the timeout
        for _ in 0..4 {
            std::thread::sleep(Duration::from_millis(25));
            assert!(gate.is_authorized(&id), "Active session must stay alive");
        }
    }
}
