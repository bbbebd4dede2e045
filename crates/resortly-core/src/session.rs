// ── Session context ──
//
// The bearer token is the only state shared by every store. It is held
// here, injected into each store at construction, and persisted through
// a pluggable `TokenStore` (a file in the CLI, memory in tests).

use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwapOption;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use resortly_api::AuthUser;

/// Where the token survives between runs.
pub trait TokenStore: Send + Sync {
    /// The persisted token, if one exists and has not expired.
    fn load(&self) -> Option<SecretString>;
    fn save(&self, token: &SecretString) -> std::io::Result<()>;
    fn clear(&self) -> std::io::Result<()>;
}

/// Process-local token storage.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: ArcSwapOption<SecretString>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<SecretString> {
        self.token
            .load_full()
            .map(|t| SecretString::from(t.expose_secret().to_owned()))
    }

    fn save(&self, token: &SecretString) -> std::io::Result<()> {
        let copy = SecretString::from(token.expose_secret().to_owned());
        self.token.store(Some(Arc::new(copy)));
        Ok(())
    }

    fn clear(&self) -> std::io::Result<()> {
        self.token.store(None);
        Ok(())
    }
}

type SignOutHook = Box<dyn Fn() + Send + Sync>;

/// Authentication state shared by all stores.
pub struct Session {
    token: ArcSwapOption<SecretString>,
    user: watch::Sender<Option<Arc<AuthUser>>>,
    persist: Arc<dyn TokenStore>,
    on_sign_out: Mutex<Vec<SignOutHook>>,
}

impl Session {
    /// Create a session, restoring any token the store still holds.
    pub fn new(persist: Arc<dyn TokenStore>) -> Self {
        let restored = persist.load().map(Arc::new);
        if restored.is_some() {
            debug!("restored persisted session token");
        }
        let (user, _) = watch::channel(None);
        Self {
            token: ArcSwapOption::new(restored),
            user,
            persist,
            on_sign_out: Mutex::new(Vec::new()),
        }
    }

    /// A session that forgets everything when dropped.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    /// Current token, if any.
    pub fn token(&self) -> Option<Arc<SecretString>> {
        self.token.load_full()
    }

    /// Current token, or [`StoreError::AuthRequired`].
    pub fn require_token(&self) -> Result<Arc<SecretString>, StoreError> {
        self.token().ok_or(StoreError::AuthRequired)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.load().is_some()
    }

    pub fn user(&self) -> Option<Arc<AuthUser>> {
        self.user.borrow().clone()
    }

    pub fn subscribe_user(&self) -> watch::Receiver<Option<Arc<AuthUser>>> {
        self.user.subscribe()
    }

    /// Install a fresh token and user, and persist the token. Replacing a
    /// live session drops whatever the previous account had cached.
    pub fn sign_in(&self, token: SecretString, user: AuthUser) {
        if let Err(e) = self.persist.save(&token) {
            warn!(error = %e, "could not persist session token");
        }
        let replaced = self.token.swap(Some(Arc::new(token)));
        info!(user = %user.email, "signed in");
        self.user.send_replace(Some(Arc::new(user)));
        if replaced.is_some() {
            self.run_sign_out_hooks();
        }
    }

    /// Adopt a token obtained elsewhere (e.g. from the environment) without a user.
    pub fn set_token(&self, token: SecretString) {
        self.token.store(Some(Arc::new(token)));
    }

    pub fn set_user(&self, user: Option<AuthUser>) {
        self.user.send_replace(user.map(Arc::new));
    }

    /// Drop the token and user, and empty every account-scoped cache.
    /// Returns the token that was active.
    pub fn sign_out(&self) -> Option<Arc<SecretString>> {
        let previous = self.token.swap(None);
        self.user.send_replace(None);
        if let Err(e) = self.persist.clear() {
            warn!(error = %e, "could not remove persisted session token");
        }
        self.run_sign_out_hooks();
        previous
    }

    /// Register `hook` to run whenever the session ends or changes hands.
    pub(crate) fn on_sign_out(&self, hook: impl Fn() + Send + Sync + 'static) {
        self.on_sign_out
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(hook));
    }

    fn run_sign_out_hooks(&self) {
        let hooks = self.on_sign_out.lock().unwrap_or_else(PoisonError::into_inner);
        debug!(count = hooks.len(), "clearing account-scoped state");
        for hook in hooks.iter() {
            hook();
        }
    }

    /// The server rejected `used`. Sign out, unless the session has already
    /// moved on to a different token.
    pub(crate) fn expire(&self, used: &Arc<SecretString>) {
        let current = self.token.load_full();
        let still_current = current
            .as_ref()
            .is_some_and(|active| Arc::ptr_eq(active, used));
        if still_current {
            warn!("session token rejected by server, signing out");
            self.sign_out();
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .field("user", &self.user().map(|u| u.email.clone()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use resortly_api::Role;

    fn user() -> AuthUser {
        AuthUser {
            id: "u-1".into(),
            name: "Tamu".into(),
            email: "tamu@example.com".into(),
            role: Role::Customer,
            email_verified_at: None,
            google_id: None,
        }
    }

    #[test]
    fn sign_in_persists_and_sign_out_clears() {
        let store = Arc::new(MemoryTokenStore::new());
        let session = Session::new(store.clone());
        assert!(session.require_token().is_err());

        session.sign_in(SecretString::from("t-1".to_owned()), user());
        assert_eq!(store.load().unwrap().expose_secret(), "t-1");
        assert!(session.user().is_some());

        session.sign_out();
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert!(store.load().is_none());
    }

    #[test]
    fn restores_persisted_token() {
        let store = Arc::new(MemoryTokenStore::new());
        store.save(&SecretString::from("kept".to_owned())).unwrap();
        let session = Session::new(store);
        assert_eq!(session.token().unwrap().expose_secret(), "kept");
    }

    #[test]
    fn sign_out_and_account_switch_run_hooks() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let session = Session::in_memory();
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        session.on_sign_out(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        session.sign_in(SecretString::from("a".to_owned()), user());
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        session.sign_in(SecretString::from("b".to_owned()), user());
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        session.sign_out();
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn stale_rejection_does_not_log_out_new_session() {
        let session = Session::in_memory();
        session.set_token(SecretString::from("old".to_owned()));
        let old = session.token().unwrap();

        session.sign_in(SecretString::from("new".to_owned()), user());
        session.expire(&old);
        assert!(session.is_authenticated());

        let current = session.token().unwrap();
        session.expire(&current);
        assert!(!session.is_authenticated());
    }
}
