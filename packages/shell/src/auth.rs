//! Authentication boundary.
//!
//! The shell only needs three things from an identity provider: a stream of
//! "current user or nobody" changes, and the two ways of getting a user
//! (sign in, register). [`InMemoryAuth`] implements that for demos and
//! tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum password length accepted on registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// An authenticated volunteer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Provider-assigned identifier.
    pub uid: String,
    /// Sign-in email.
    pub email: String,
}

/// Errors that can occur while authenticating.
///
/// The `Display` text is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Email or password left empty.
    #[error("Email and password are required")]
    MissingCredentials,

    /// The email is not shaped like an address.
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// Unknown email or wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Registration with an email that already has an account.
    #[error("An account already exists for {0}")]
    EmailInUse(String),

    /// Registration password too short.
    #[error("Password must be at least {min} characters")]
    WeakPassword {
        /// Required minimum length.
        min: usize,
    },

    /// Any other provider failure.
    #[error("Authentication provider error: {message}")]
    Provider {
        /// Provider message.
        message: String,
    },
}

/// Callback receiving every change of the current user.
pub type AuthListener = Box<dyn Fn(Option<&User>) + Send + Sync>;

type SharedListener = Arc<dyn Fn(Option<&User>) + Send + Sync>;

#[derive(Default)]
struct ListenerRegistry {
    next_id: u64,
    listeners: Vec<(u64, SharedListener)>,
}

/// Shared list of auth listeners.
///
/// Callbacks run with the registry unlocked, so a listener may subscribe or
/// unsubscribe while it is being called.
#[derive(Default, Clone)]
pub struct Listeners {
    inner: Arc<Mutex<ListenerRegistry>>,
}

impl Listeners {
    /// Adds `listener` and returns the handle that removes it.
    #[must_use]
    pub fn add(&self, listener: AuthListener) -> Subscription {
        let mut registry = lock(&self.inner);
        registry.next_id += 1;
        let id = registry.next_id;
        registry.listeners.push((id, Arc::from(listener)));

        Subscription {
            registry: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Calls every listener with `user`.
    pub fn emit(&self, user: Option<&User>) {
        let listeners: Vec<SharedListener> = lock(&self.inner)
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(user);
        }
    }

    /// Calls only the listener behind `subscription`, if it is still
    /// registered.
    pub fn emit_to(&self, subscription: &Subscription, user: Option<&User>) {
        let listener = lock(&self.inner)
            .listeners
            .iter()
            .find(|(id, _)| *id == subscription.id)
            .map(|(_, listener)| Arc::clone(listener));
        if let Some(listener) = listener {
            listener(user);
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.inner).listeners.len()
    }

    /// Whether nobody is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps a listener registered; dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    registry: Weak<Mutex<ListenerRegistry>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let removed = {
            let mut registry = lock(&registry);
            registry
                .listeners
                .iter()
                .position(|(id, _)| *id == self.id)
                .map(|index| registry.listeners.remove(index))
        };
        // The listener may own subscriptions of its own; release it unlocked.
        drop(removed);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// An identity provider.
#[async_trait::async_trait]
pub trait AuthProvider: Send + Sync {
    /// Registers `listener` for current-user changes. The provider calls it
    /// at least once when it knows the initial state, and again after every
    /// sign-in or sign-out.
    fn subscribe(&self, listener: AuthListener) -> Subscription;

    /// Signs in with an existing account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] if the credentials are rejected.
    async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError>;

    /// Creates an account and signs it in.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] if the account cannot be created.
    async fn register(&self, email: &str, password: &str) -> Result<User, AuthError>;

    /// Signs the current user out.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] if the provider fails.
    async fn sign_out(&self) -> Result<(), AuthError>;
}

struct Account {
    password: String,
    user: User,
}

#[derive(Default)]
struct AuthState {
    ready: bool,
    current: Option<User>,
    accounts: BTreeMap<String, Account>,
}

/// Process-local [`AuthProvider`].
///
/// Starts "not ready": subscribers hear nothing until [`Self::mark_ready`],
/// mirroring a provider that restores its session asynchronously.
#[derive(Default)]
pub struct InMemoryAuth {
    state: Mutex<AuthState>,
    listeners: Listeners,
}

impl InMemoryAuth {
    /// Creates a provider with no accounts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider that is already ready.
    #[must_use]
    pub fn ready() -> Self {
        let auth = Self::new();
        auth.mark_ready();
        auth
    }

    /// Finishes session restoration and tells every subscriber who is
    /// signed in.
    pub fn mark_ready(&self) {
        let current = {
            let mut state = lock(&self.state);
            state.ready = true;
            state.current.clone()
        };
        log::debug!("Auth provider ready");
        self.listeners.emit(current.as_ref());
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    fn set_current(&self, user: Option<User>) {
        let ready = {
            let mut state = lock(&self.state);
            state.current.clone_from(&user);
            state.ready
        };
        if ready {
            self.listeners.emit(user.as_ref());
        }
    }
}

fn validate(email: &str, password: &str) -> Result<String, AuthError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(AuthError::InvalidEmail(email.to_string()));
    }
    Ok(email.to_lowercase())
}

#[async_trait::async_trait]
impl AuthProvider for InMemoryAuth {
    fn subscribe(&self, listener: AuthListener) -> Subscription {
        let subscription = self.listeners.add(listener);
        let initial = {
            let state = lock(&self.state);
            state.ready.then(|| state.current.clone())
        };
        if let Some(current) = initial {
            self.listeners.emit_to(&subscription, current.as_ref());
        }
        subscription
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = validate(email, password)?;
        let user = {
            let state = lock(&self.state);
            match state.accounts.get(&email) {
                Some(account) if account.password == password => account.user.clone(),
                _ => return Err(AuthError::InvalidCredentials),
            }
        };

        log::info!("Signed in {}", user.email);
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = validate(email, password)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword {
                min: MIN_PASSWORD_LEN,
            });
        }

        let user = {
            let mut state = lock(&self.state);
            if state.accounts.contains_key(&email) {
                return Err(AuthError::EmailInUse(email));
            }
            let user = User {
                uid: uuid::Uuid::new_v4().to_string(),
                email: email.clone(),
            };
            state.accounts.insert(
                email,
                Account {
                    password: password.to_string(),
                    user: user.clone(),
                },
            );
            user
        };

        log::info!("Registered {}", user.email);
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        log::info!("Signed out");
        self.set_current(None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counting_listener(count: &Arc<AtomicUsize>) -> AuthListener {
        let count = Arc::clone(count);
        Box::new(move |_| {
            count.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let auth = InMemoryAuth::ready();
        let calls = Arc::new(AtomicUsize::new(0));

        let subscription = auth.subscribe(counting_listener(&calls));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(auth.subscriber_count(), 1);

        drop(subscription);
        assert_eq!(auth.subscriber_count(), 0);
        auth.mark_ready();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn not_ready_provider_stays_silent() {
        let auth = InMemoryAuth::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let _subscription = auth.subscribe(counting_listener(&calls));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        auth.mark_ready();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn initial_state_arrives_after_registration() {
        let auth = Arc::new(InMemoryAuth::ready());
        let seen_count = Arc::new(AtomicUsize::new(0));

        let provider = Arc::downgrade(&auth);
        let sink = Arc::clone(&seen_count);
        let _subscription = auth.subscribe(Box::new(move |_| {
            if let Some(provider) = provider.upgrade() {
                sink.store(provider.subscriber_count(), Ordering::SeqCst);
            }
        }));

        assert_eq!(seen_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn listener_can_subscribe_while_being_called() {
        let listeners = Listeners::default();
        let nested = Arc::new(Mutex::new(Vec::new()));

        let registry = listeners.clone();
        let keep = Arc::clone(&nested);
        let _outer = listeners.add(Box::new(move |_| {
            let subscription = registry.add(Box::new(|_| {}));
            lock(&keep).push(subscription);
        }));

        listeners.emit(None);
        assert_eq!(listeners.len(), 2);

        lock(&nested).clear();
        assert_eq!(listeners.len(), 1);
    }

    #[tokio::test]
    async fn register_then_sign_in() {
        let auth = InMemoryAuth::ready();

        let registered = auth.register("Giulia@Example.org", "secret1").await.unwrap();
        assert_eq!(registered.email, "giulia@example.org");

        auth.sign_out().await.unwrap();
        let signed_in = auth.sign_in("giulia@example.org", "secret1").await.unwrap();
        assert_eq!(signed_in, registered);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let auth = InMemoryAuth::ready();
        auth.register("marco@example.org", "secret1").await.unwrap();

        assert_eq!(
            auth.sign_in("marco@example.org", "nope").await,
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            auth.sign_in("nobody@example.org", "secret1").await,
            Err(AuthError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn registration_is_validated() {
        let auth = InMemoryAuth::ready();

        assert_eq!(
            auth.register("", "secret1").await,
            Err(AuthError::MissingCredentials)
        );
        assert_eq!(
            auth.register("not-an-email", "secret1").await,
            Err(AuthError::InvalidEmail("not-an-email".to_string()))
        );
        assert_eq!(
            auth.register("sofia@example.org", "abc").await,
            Err(AuthError::WeakPassword { min: 6 })
        );

        auth.register("sofia@example.org", "secret1").await.unwrap();
        assert_eq!(
            auth.register("sofia@example.org", "secret2").await,
            Err(AuthError::EmailInUse("sofia@example.org".to_string()))
        );
    }

    #[tokio::test]
    async fn listeners_hear_sign_in_and_out() {
        let auth = InMemoryAuth::ready();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _subscription = auth.subscribe(Box::new(move |user| {
            lock(&sink).push(user.map(|u| u.email.clone()));
        }));

        auth.register("alessio@example.org", "secret1").await.unwrap();
        auth.sign_out().await.unwrap();

        assert_eq!(
            *lock(&seen),
            vec![None, Some("alessio@example.org".to_string()), None]
        );
    }
}
