//! Auth service: the anonymous ↔ authenticated state machine.
//!
//! Registration and login wait an artificial latency through the injected
//! [`Sleeper`](super::runtime::Sleeper) to emulate a network round trip.
//! On success the registered-user table and the session are persisted
//! before the new [`SessionState`] is published, so subscribers never see a
//! session that failed to save.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::credentials::{LoginCredentials, RegistrationForm, RegistrationInput};
use super::error::AuthError;
use super::runtime::ServiceRuntime;
use super::session::SessionState;
use super::session_store::{SessionStore, StorageKey};
use super::user::{Email, RegisteredUser, User};

/// Registered-user table keyed by normalised email.
pub type RegisteredUserTable = BTreeMap<Email, RegisteredUser>;

/// Simulated round-trip delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthLatency {
    /// Delay before a registration resolves.
    pub register: Duration,
    /// Delay before a login resolves.
    pub login: Duration,
}

impl AuthLatency {
    /// No artificial delay.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            register: Duration::ZERO,
            login: Duration::ZERO,
        }
    }
}

impl Default for AuthLatency {
    fn default() -> Self {
        Self {
            register: Duration::from_millis(1000),
            login: Duration::from_millis(800),
        }
    }
}

/// Owns the session and the registered-user table.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use survivor_hub::domain::{AuthLatency, AuthService, ServiceRuntime, SessionStore};
/// use survivor_hub::outbound::storage::InMemoryKeyValueStore;
///
/// let store = SessionStore::new(Arc::new(InMemoryKeyValueStore::default()));
/// let auth = AuthService::start(store, ServiceRuntime::default(), AuthLatency::none());
/// assert!(!auth.is_authenticated());
/// ```
#[derive(Debug)]
pub struct AuthService {
    store: SessionStore,
    runtime: ServiceRuntime,
    latency: AuthLatency,
    users: Mutex<RegisteredUserTable>,
    session: watch::Sender<SessionState>,
}

impl AuthService {
    /// Rehydrate persisted state and start serving.
    ///
    /// Corrupt records are purged by the store and the service starts
    /// anonymous with an empty table.
    pub fn start(store: SessionStore, runtime: ServiceRuntime, latency: AuthLatency) -> Self {
        let users: RegisteredUserTable = store
            .load(StorageKey::RegisteredUsers)
            .unwrap_or_default();
        let session = SessionState::from(store.load::<User>(StorageKey::Session));
        info!(
            registered = users.len(),
            authenticated = session.is_authenticated(),
            "auth service started"
        );
        let (session, _) = watch::channel(session);
        Self {
            store,
            runtime,
            latency,
            users: Mutex::new(users),
            session,
        }
    }

    /// Receive the current session and every later change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.session.subscribe()
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn current_session(&self) -> SessionState {
        self.session.borrow().clone()
    }

    /// The logged-in survivor, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.session.borrow().user().cloned()
    }

    /// `true` when a survivor is logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.borrow().is_authenticated()
    }

    /// `true` when `email` already has an account.
    #[must_use]
    pub fn is_email_registered(&self, email: &Email) -> bool {
        self.lock_users().contains_key(email)
    }

    /// Number of registered accounts.
    #[must_use]
    pub fn registered_count(&self) -> usize {
        self.lock_users().len()
    }

    /// Validate a raw form, then [`register`](Self::register) it.
    pub async fn submit_registration(&self, form: &RegistrationForm) -> Result<User, AuthError> {
        let input = form.validate()?;
        self.register(input).await
    }

    /// Create an account and log it in.
    ///
    /// A duplicate email fails straight away; it is checked again after the
    /// latency in case a concurrent registration won the race.
    pub async fn register(&self, input: RegistrationInput) -> Result<User, AuthError> {
        if self.is_email_registered(input.email()) {
            return Err(AuthError::DuplicateEmail {
                email: input.email().clone(),
            });
        }

        self.runtime.sleeper.sleep(self.latency.register).await;

        let (name, surname, email, country, password) = input.into_parts();
        let user = User::new(name, surname, email.clone(), country, self.runtime.clock.utc());
        {
            let mut users = self.lock_users();
            if users.contains_key(&email) {
                return Err(AuthError::DuplicateEmail { email });
            }
            users.insert(email.clone(), RegisteredUser::new(user.clone(), password));
            if let Err(err) = self.store.save(StorageKey::RegisteredUsers, &*users) {
                users.remove(&email);
                warn!(email = %email, error = %err, "registration not persisted");
                return Err(err.into());
            }
        }

        self.establish(&user)?;
        info!(email = %email, country = %user.country(), "survivor registered");
        Ok(user)
    }

    /// Validate raw inputs, then [`login`](Self::login).
    pub async fn submit_login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let credentials = LoginCredentials::try_from_parts(email, password)?;
        self.login(&credentials).await
    }

    /// Log in an existing account.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User, AuthError> {
        self.runtime.sleeper.sleep(self.latency.login).await;

        let user = {
            let users = self.lock_users();
            let Some(entry) = users.get(credentials.email()) else {
                debug!(email = %credentials.email(), "login for unknown email");
                return Err(AuthError::UserNotFound {
                    email: credentials.email().clone(),
                });
            };
            if !entry.password_matches(credentials.password()) {
                debug!(email = %credentials.email(), "login with wrong password");
                return Err(AuthError::InvalidPassword);
            }
            entry.user().clone()
        };

        self.establish(&user)?;
        info!(email = %user.email(), "survivor logged in");
        Ok(user)
    }

    /// Return to anonymous. Never fails.
    ///
    /// The registered-user table is kept. A storage failure is logged and
    /// the in-memory state still becomes anonymous.
    pub fn logout(&self) {
        if let Err(err) = self.store.remove(StorageKey::Session) {
            warn!(error = %err, "failed to clear persisted session");
        }
        let changed = self.session.send_if_modified(|state| {
            if state.is_authenticated() {
                *state = SessionState::Anonymous;
                true
            } else {
                false
            }
        });
        if changed {
            info!("survivor logged out");
        }
    }

    /// Add accounts whose emails are not yet registered.
    ///
    /// The table is persisted once; on failure nothing is added. Returns
    /// how many accounts were inserted.
    pub fn seed_registered_users(
        &self,
        accounts: impl IntoIterator<Item = RegisteredUser>,
    ) -> Result<usize, AuthError> {
        let mut users = self.lock_users();
        let mut inserted = Vec::new();
        for account in accounts {
            if !users.contains_key(account.email()) {
                inserted.push(account.email().clone());
                users.insert(account.email().clone(), account);
            }
        }
        if inserted.is_empty() {
            return Ok(0);
        }
        if let Err(err) = self.store.save(StorageKey::RegisteredUsers, &*users) {
            for email in &inserted {
                users.remove(email);
            }
            return Err(err.into());
        }
        info!(count = inserted.len(), "registered users seeded");
        Ok(inserted.len())
    }

    fn establish(&self, user: &User) -> Result<(), AuthError> {
        self.store.save(StorageKey::Session, user).map_err(|err| {
            warn!(email = %user.email(), error = %err, "session not persisted");
            AuthError::from(err)
        })?;
        self.session
            .send_replace(SessionState::Authenticated(user.clone()));
        Ok(())
    }

    fn lock_users(&self) -> MutexGuard<'_, RegisteredUserTable> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
