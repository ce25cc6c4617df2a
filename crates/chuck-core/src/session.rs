//! Session management for the local login flow
//!
//! The session service validates login and registration input, compares it
//! with the single stored account, and drives the credential store's
//! logged-in flag. Its observable [`SessionState`] mirrors the store's flag
//! and email, and adds the progress and outcome of the last operation.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::credentials::CredentialStore;
use crate::errors::AuthError;
use crate::validation::{is_blank, is_valid_email, meets_min_length, MIN_PASSWORD_LENGTH};

// ----------------------------------------------------------------------------
// Session State
// ----------------------------------------------------------------------------

/// Logical session states; transitions only happen through explicit calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    LoggedOut,
    LoggedIn,
}

/// Observable snapshot of the session, rebuilt on every operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Mirrors the stored logged-in flag
    pub is_logged_in: bool,
    /// Mirrors the stored email (empty if unset)
    pub user_email: String,
    /// An operation is in flight
    pub is_loading: bool,
    /// Message of the last failed operation
    pub error_message: Option<String>,
    pub is_login_successful: bool,
    pub is_register_successful: bool,
}

impl SessionState {
    pub fn phase(&self) -> SessionPhase {
        if self.is_logged_in {
            SessionPhase::LoggedIn
        } else {
            SessionPhase::LoggedOut
        }
    }
}

#[derive(Clone, Copy)]
enum Operation {
    Login,
    Register,
}

// ----------------------------------------------------------------------------
// Session Service
// ----------------------------------------------------------------------------

/// Orchestrates login, registration and logout against a [`CredentialStore`]
///
/// When created inside a Tokio runtime, a background task keeps the state's
/// `is_logged_in` and `user_email` in step with direct store writes until the
/// service is dropped. Without a runtime the state only follows the service's
/// own operations.
pub struct SessionService {
    store: Arc<CredentialStore>,
    state: Arc<watch::Sender<SessionState>>,
    mirror: Option<JoinHandle<()>>,
}

impl SessionService {
    pub fn new(store: Arc<CredentialStore>) -> Self {
        let initial = SessionState {
            is_logged_in: store.is_logged_in(),
            user_email: store.current_email(),
            ..SessionState::default()
        };
        let (state, _) = watch::channel(initial);
        let state = Arc::new(state);

        let mirror = match Handle::try_current() {
            Ok(handle) => Some(handle.spawn(mirror_store(
                store.subscribe_logged_in(),
                store.subscribe_email(),
                Arc::clone(&state),
            ))),
            Err(_) => {
                warn!("No Tokio runtime, session state will not follow direct store writes");
                None
            }
        };

        Self { store, state, mirror }
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    /// Receiver for session state updates
    pub fn observe_state(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Current session state
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.borrow().phase()
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    /// Log in with the stored account
    ///
    /// Checks run in a fixed order and the first failure wins: email format,
    /// blank password, stored account present, exact match. A match re-saves
    /// the credentials, which sets the logged-in flag again.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        self.begin(Operation::Login);
        let result = self.authenticate(email, password).await;
        self.finish(Operation::Login, &result);
        result
    }

    /// Register the single account, replacing any previous one
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<(), AuthError> {
        self.begin(Operation::Register);
        let result = self.create_account(email, password, confirm_password).await;
        self.finish(Operation::Register, &result);
        result
    }

    /// Clear the logged-in flag; stored credentials stay for the next login
    pub async fn logout(&self) {
        if let Err(e) = self.store.logout().await {
            warn!("Logout could not be persisted: {}", e);
        }
        self.sync_from_store();
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|state| state.error_message = None);
    }

    pub fn clear_success_states(&self) {
        self.state.send_modify(|state| {
            state.is_login_successful = false;
            state.is_register_successful = false;
        });
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    async fn authenticate(&self, email: &str, password: &str) -> Result<(), AuthError> {
        if !is_valid_email(email) {
            return Err(AuthError::InvalidEmailFormat);
        }
        if is_blank(password) {
            return Err(AuthError::EmptyPassword);
        }

        let Some((stored_email, stored_password)) = self.store.get_stored_credentials().await else {
            debug!("Login attempt for {} with no stored account", email);
            return Err(AuthError::NoAccountFound);
        };

        if email != stored_email || password != stored_password {
            debug!("Login rejected for {}: credentials do not match", email);
            return Err(AuthError::CredentialMismatch);
        }

        self.store.save_credentials(email, password).await?;
        info!("Login successful for {}", email);
        Ok(())
    }

    async fn create_account(
        &self,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<(), AuthError> {
        if !is_valid_email(email) {
            return Err(AuthError::InvalidEmailFormat);
        }
        if !meets_min_length(password) {
            return Err(AuthError::PasswordTooShort {
                min_length: MIN_PASSWORD_LENGTH,
            });
        }
        if password != confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        self.store.save_credentials(email, password).await?;
        info!("Registered account {}", email);
        Ok(())
    }

    fn begin(&self, operation: Operation) {
        self.state.send_modify(|state| {
            state.is_loading = true;
            state.error_message = None;
            match operation {
                Operation::Login => state.is_login_successful = false,
                Operation::Register => state.is_register_successful = false,
            }
        });
    }

    fn finish(&self, operation: Operation, result: &Result<(), AuthError>) {
        let is_logged_in = self.store.is_logged_in();
        let user_email = self.store.current_email();

        self.state.send_modify(|state| {
            state.is_loading = false;
            state.is_logged_in = is_logged_in;
            state.user_email = user_email;
            state.error_message = result.as_ref().err().map(ToString::to_string);
            let succeeded = result.is_ok();
            match operation {
                Operation::Login => state.is_login_successful = succeeded,
                Operation::Register => state.is_register_successful = succeeded,
            }
        });
    }

    fn sync_from_store(&self) {
        let is_logged_in = self.store.is_logged_in();
        let user_email = self.store.current_email();
        self.state
            .send_if_modified(|state| apply_mirror(state, is_logged_in, user_email));
    }
}

impl Drop for SessionService {
    fn drop(&mut self) {
        if let Some(mirror) = &self.mirror {
            mirror.abort();
        }
    }
}

// ----------------------------------------------------------------------------
// Store Mirroring
// ----------------------------------------------------------------------------

/// Copy the store's flag and email into the session state on every change
async fn mirror_store(
    mut logged_in: watch::Receiver<bool>,
    mut email: watch::Receiver<String>,
    state: Arc<watch::Sender<SessionState>>,
) {
    loop {
        let is_logged_in = *logged_in.borrow_and_update();
        let user_email = email.borrow_and_update().clone();
        state.send_if_modified(|current| apply_mirror(current, is_logged_in, user_email));

        tokio::select! {
            changed = logged_in.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            changed = email.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
    debug!("Credential store closed, session mirror stopped");
}

fn apply_mirror(state: &mut SessionState, is_logged_in: bool, user_email: String) -> bool {
    if state.is_logged_in == is_logged_in && state.user_email == user_email {
        return false;
    }
    state.is_logged_in = is_logged_in;
    state.user_email = user_email;
    true
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn service() -> SessionService {
        SessionService::new(Arc::new(CredentialStore::in_memory()))
    }

    #[tokio::test]
    async fn test_login_check_order() {
        let session = service();

        // Format is checked before the password
        assert!(matches!(
            session.login("not-an-email", "").await,
            Err(AuthError::InvalidEmailFormat)
        ));
        assert!(matches!(
            session.login("a@b.com", "   ").await,
            Err(AuthError::EmptyPassword)
        ));
        assert!(matches!(
            session.login("a@b.com", "secret1").await,
            Err(AuthError::NoAccountFound)
        ));

        session.register("a@b.com", "secret1", "secret1").await.unwrap();
        assert!(matches!(
            session.login("a@b.com", "wrong").await,
            Err(AuthError::CredentialMismatch)
        ));
        assert!(matches!(
            session.login("x@b.com", "secret1").await,
            Err(AuthError::CredentialMismatch)
        ));
    }

    #[tokio::test]
    async fn test_register_check_order() {
        let session = service();

        assert!(matches!(
            session.register("bad", "1", "2").await,
            Err(AuthError::InvalidEmailFormat)
        ));
        assert!(matches!(
            session.register("a@b.com", "12345", "54321").await,
            Err(AuthError::PasswordTooShort { min_length: 6 })
        ));
        assert!(matches!(
            session.register("a@b.com", "secret1", "secret2").await,
            Err(AuthError::PasswordMismatch)
        ));
        assert!(session.register("a@b.com", "secret1", "secret1").await.is_ok());
        assert_eq!(session.phase(), SessionPhase::LoggedIn);
    }

    #[tokio::test]
    async fn test_register_overwrites_existing_account() {
        let session = service();
        session.register("a@b.com", "secret1", "secret1").await.unwrap();
        session.register("c@d.com", "secret2", "secret2").await.unwrap();

        assert!(matches!(
            session.login("a@b.com", "secret1").await,
            Err(AuthError::CredentialMismatch)
        ));
        assert!(session.login("c@d.com", "secret2").await.is_ok());
    }

    #[tokio::test]
    async fn test_state_tracks_outcomes() {
        let session = service();

        let _ = session.login("a@b.com", "secret1").await;
        let state = session.state();
        assert!(!state.is_loading);
        assert!(!state.is_login_successful);
        assert_eq!(
            state.error_message.as_deref(),
            Some("No account found. Please register first.")
        );

        session.register("a@b.com", "secret1", "secret1").await.unwrap();
        let state = session.state();
        assert!(state.is_register_successful);
        assert!(state.error_message.is_none());
        assert!(state.is_logged_in);
        assert_eq!(state.user_email, "a@b.com");

        session.clear_success_states();
        assert!(!session.state().is_register_successful);
    }

    #[tokio::test]
    async fn test_clear_error() {
        let session = service();
        let _ = session.register("a@b.com", "short", "short").await;
        assert!(session.state().error_message.is_some());

        session.clear_error();
        assert!(session.state().error_message.is_none());
    }

    #[tokio::test]
    async fn test_logout_survives_storage_fault() {
        let storage = MemoryStorage::new();
        let faults = storage.fault_switch();
        let session = SessionService::new(Arc::new(CredentialStore::open(Box::new(storage))));
        session.register("a@b.com", "secret1", "secret1").await.unwrap();

        faults.trip();
        session.logout().await;
        assert_eq!(session.phase(), SessionPhase::LoggedIn);
    }

    #[test]
    fn test_created_outside_runtime() {
        let session = service();
        assert!(session.mirror.is_none());

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async {
            session.register("a@b.com", "secret1", "secret1").await.unwrap();
            session.logout().await;
        });

        let state = session.state();
        assert!(!state.is_logged_in);
        assert_eq!(state.user_email, "a@b.com");
    }

    #[tokio::test]
    async fn test_register_counts_utf16_units() {
        let session = service();
        assert!(session.register("a@b.com", "😀😀😀", "😀😀😀").await.is_ok());
        assert!(matches!(
            session.register("a@b.com", "😀😀", "😀😀").await,
            Err(AuthError::PasswordTooShort { .. })
        ));
    }

    #[tokio::test]
    async fn test_mirror_follows_direct_store_writes() {
        let store = Arc::new(CredentialStore::in_memory());
        let session = SessionService::new(Arc::clone(&store));
        let mut state = session.observe_state();

        store.save_credentials("a@b.com", "secret1").await.unwrap();
        let mirrored = state
            .wait_for(|s| s.is_logged_in && s.user_email == "a@b.com")
            .await
            .unwrap()
            .clone();
        assert_eq!(mirrored.phase(), SessionPhase::LoggedIn);

        store.logout().await.unwrap();
        state.wait_for(|s| !s.is_logged_in).await.unwrap();
    }
}
