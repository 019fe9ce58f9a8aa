//! Client-side belief about which user is authenticated.
//!
//! Derived from the identity endpoint, never from token presence alone. The
//! session itself performs no navigation; the admission gate consumes it.

use crate::models::UserProfile;

#[derive(Debug, Clone)]
pub struct Session {
    user: Option<UserProfile>,
    loading: bool,
}

impl Session {
    /// A fresh session is loading until the first identity check settles.
    pub fn new() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Apply the outcome of an identity check. Any failure maps to `None`;
    /// `loading` clears in every case and never comes back for this value's
    /// lifetime. Safe to apply repeatedly: the last outcome wins.
    pub fn resolve(&mut self, user: Option<UserProfile>) {
        self.user = user;
        self.loading = false;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Admission decision for the guarded chat view. Evaluated from current
/// session state on every frame; prior decisions are never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Identity still resolving: render a neutral waiting frame.
    Pending,
    /// No user: bounce to the login view.
    Denied,
    /// Render the guarded content unchanged.
    Admitted,
}

impl Gate {
    pub fn evaluate(session: &Session) -> Self {
        if session.is_loading() {
            Gate::Pending
        } else if session.user().is_some() {
            Gate::Admitted
        } else {
            Gate::Denied
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn profile() -> UserProfile {
        UserProfile {
            id: "1".to_string(),
            email: "reader@example.com".to_string(),
            name: None,
            role: "user".to_string(),
            created_at: NaiveDateTime::parse_from_str("2026-08-05T12:00:00", "%Y-%m-%dT%H:%M:%S")
                .unwrap(),
        }
    }

    #[test]
    fn fresh_session_is_pending() {
        let session = Session::new();
        assert!(session.is_loading());
        assert_eq!(Gate::evaluate(&session), Gate::Pending);
    }

    #[test]
    fn failed_identity_check_denies() {
        let mut session = Session::new();
        session.resolve(None);
        assert!(!session.is_loading());
        assert!(session.user().is_none());
        assert_eq!(Gate::evaluate(&session), Gate::Denied);
    }

    #[test]
    fn successful_identity_check_admits() {
        let mut session = Session::new();
        session.resolve(Some(profile()));
        assert_eq!(Gate::evaluate(&session), Gate::Admitted);
    }

    #[test]
    fn resolve_is_idempotent() {
        let mut session = Session::new();
        session.resolve(Some(profile()));
        let first_user = session.user().cloned();
        session.resolve(Some(profile()));
        assert_eq!(session.user().cloned(), first_user);
        assert!(!session.is_loading());
    }

    #[test]
    fn logout_refresh_clears_user_without_reloading() {
        let mut session = Session::new();
        session.resolve(Some(profile()));
        // Token deleted, next identity check fails
        session.resolve(None);
        assert!(session.user().is_none());
        assert!(!session.is_loading());
        assert_eq!(Gate::evaluate(&session), Gate::Denied);
    }
}
