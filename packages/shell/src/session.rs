//! Who is signed in, as last reported by the auth provider.

use std::sync::{Arc, Mutex, PoisonError};

use crate::auth::{AuthProvider, Subscription, User};

/// Session state. Every provider emission replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// The provider has not reported yet.
    Loading,
    /// A user is signed in.
    SignedIn(User),
    /// Nobody is signed in.
    SignedOut,
}

impl SessionState {
    /// The signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::SignedIn(user) => Some(user),
            Self::Loading | Self::SignedOut => None,
        }
    }
}

/// Live view of the provider's current user.
///
/// Dropping the session unsubscribes from the provider.
pub struct Session {
    state: Arc<Mutex<SessionState>>,
    _subscription: Subscription,
}

impl Session {
    /// Subscribes to `auth` and starts in [`SessionState::Loading`].
    #[must_use]
    pub fn start(auth: &dyn AuthProvider) -> Self {
        let state = Arc::new(Mutex::new(SessionState::Loading));
        let sink = Arc::clone(&state);

        let subscription = auth.subscribe(Box::new(move |user| {
            let next = user.map_or(SessionState::SignedOut, |user| {
                SessionState::SignedIn(user.clone())
            });
            log::debug!("Session changed: {next:?}");
            *sink.lock().unwrap_or_else(PoisonError::into_inner) = next;
        }));

        Self {
            state,
            _subscription: subscription,
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state().user().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::InMemoryAuth;

    #[test]
    fn loading_until_first_emission() {
        let auth = InMemoryAuth::new();
        let session = Session::start(&auth);
        assert_eq!(session.state(), SessionState::Loading);

        auth.mark_ready();
        assert_eq!(session.state(), SessionState::SignedOut);
    }

    #[tokio::test]
    async fn latest_emission_wins() {
        let auth = InMemoryAuth::ready();
        let session = Session::start(&auth);

        let user = auth.register("giulia@example.org", "secret1").await.unwrap();
        assert_eq!(session.state(), SessionState::SignedIn(user.clone()));
        assert_eq!(session.user(), Some(user));

        auth.sign_out().await.unwrap();
        assert_eq!(session.state(), SessionState::SignedOut);
    }

    #[test]
    fn dropping_session_unsubscribes() {
        let auth = InMemoryAuth::ready();
        let session = Session::start(&auth);
        assert_eq!(auth.subscriber_count(), 1);

        drop(session);
        assert_eq!(auth.subscriber_count(), 0);
    }
}
