//! Authenticated-identity state of the running client.
//!
//! [`Session`] carries the user inside the `Authenticated` variant, so the
//! status and the user are always updated together: an authenticated session
//! without a user, or an unauthenticated session with one, cannot be
//! represented.

use crate::types::User;

/// Session state machine value.
///
/// ```text
/// Unknown → Checking → Authenticated(user) | Unauthenticated
/// ```
///
/// The two resolved states are re-entered only through login, logout, or a
/// session-invalidated signal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Session {
    /// Process just started; nothing is known yet.
    #[default]
    Unknown,
    /// The boot identity check is in flight.
    Checking,
    /// Logged in as the contained user.
    Authenticated(User),
    /// Not logged in.
    Unauthenticated,
}

/// Field-less view of [`Session`], useful for logging and routing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    /// See [`Session::Unknown`].
    Unknown,
    /// See [`Session::Checking`].
    Checking,
    /// See [`Session::Authenticated`].
    Authenticated,
    /// See [`Session::Unauthenticated`].
    Unauthenticated,
}

impl Session {
    /// Status without the user payload.
    pub fn status(&self) -> SessionStatus {
        match self {
            Self::Unknown => SessionStatus::Unknown,
            Self::Checking => SessionStatus::Checking,
            Self::Authenticated(_) => SessionStatus::Authenticated,
            Self::Unauthenticated => SessionStatus::Unauthenticated,
        }
    }

    /// The logged-in user, present iff authenticated.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Whether a user is logged in.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Whether the boot check has not resolved yet.
    pub fn is_resolving(&self) -> bool {
        matches!(self, Self::Unknown | Self::Checking)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::UserId;

    fn ada() -> User {
        User {
            id: UserId::new(1),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            created_at: None,
        }
    }

    #[test]
    fn starts_unknown() {
        let session = Session::default();
        assert_eq!(session.status(), SessionStatus::Unknown);
        assert!(session.is_resolving());
        assert!(session.user().is_none());
    }

    #[test]
    fn user_present_iff_authenticated() {
        let all = [
            Session::Unknown,
            Session::Checking,
            Session::Authenticated(ada()),
            Session::Unauthenticated,
        ];
        for session in all {
            assert_eq!(session.user().is_some(), session.is_authenticated());
            assert_eq!(
                session.is_authenticated(),
                session.status() == SessionStatus::Authenticated
            );
        }
    }

    #[test]
    fn authenticated_exposes_user() {
        let session = Session::Authenticated(ada());
        assert_eq!(session.user().map(|u| u.name.as_str()), Some("Ada"));
        assert!(!session.is_resolving());
    }
}
