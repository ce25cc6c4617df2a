//! Persisted single-account credentials with observable login state
//!
//! The store keeps exactly one email/password pair and a logged-in flag in a
//! [`KeyValueStore`]. The flag and email are published through `watch`
//! channels: every subscriber sees the latest value immediately and then each
//! later change, and nothing can write back through a subscription.

use tokio::sync::{watch, Mutex};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, warn};

use crate::errors::StorageError;
use crate::storage::{KeyValueStore, MemoryStorage, StoredValue, WriteBatch};

pub const KEY_IS_LOGGED_IN: &str = "is_logged_in";
pub const KEY_USER_EMAIL: &str = "user_email";
pub const KEY_USER_PASSWORD: &str = "user_password";

// ----------------------------------------------------------------------------
// Credential Store
// ----------------------------------------------------------------------------

/// Single-record credential holder
///
/// Writes are serialized by the mutex around the backend, and observers are
/// notified while the lock is still held so notifications follow write order.
pub struct CredentialStore {
    storage: Mutex<Box<dyn KeyValueStore>>,
    logged_in: watch::Sender<bool>,
    email: watch::Sender<String>,
}

impl CredentialStore {
    /// Wrap `storage`, seeding the observable state from what is persisted
    pub fn open(storage: Box<dyn KeyValueStore>) -> Self {
        let (is_logged_in, email) = match storage.snapshot() {
            Ok(snapshot) => (
                snapshot
                    .get(KEY_IS_LOGGED_IN)
                    .and_then(StoredValue::as_bool)
                    .unwrap_or(false),
                snapshot
                    .get(KEY_USER_EMAIL)
                    .and_then(StoredValue::as_text)
                    .unwrap_or_default()
                    .to_string(),
            ),
            Err(e) => {
                warn!("Failed to load persisted login state, starting logged out: {}", e);
                (false, String::new())
            }
        };

        debug!("Credential store opened (logged in: {})", is_logged_in);
        let (logged_in, _) = watch::channel(is_logged_in);
        let (email, _) = watch::channel(email);

        Self {
            storage: Mutex::new(storage),
            logged_in,
            email,
        }
    }

    /// Store backed by a fresh [`MemoryStorage`]
    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryStorage::new()))
    }

    // ------------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------------

    /// Stream of the logged-in flag, starting with the current value
    pub fn observe_logged_in(&self) -> WatchStream<bool> {
        WatchStream::new(self.logged_in.subscribe())
    }

    /// Stream of the stored email (empty if unset), starting with the current value
    pub fn observe_email(&self) -> WatchStream<String> {
        WatchStream::new(self.email.subscribe())
    }

    /// Raw receiver for the logged-in flag
    pub fn subscribe_logged_in(&self) -> watch::Receiver<bool> {
        self.logged_in.subscribe()
    }

    /// Raw receiver for the stored email
    pub fn subscribe_email(&self) -> watch::Receiver<String> {
        self.email.subscribe()
    }

    pub fn is_logged_in(&self) -> bool {
        *self.logged_in.borrow()
    }

    pub fn current_email(&self) -> String {
        self.email.borrow().clone()
    }

    // ------------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------------

    /// Mark the account logged in and overwrite the stored email and password
    ///
    /// All three keys are written in one batch.
    pub async fn save_credentials(&self, email: &str, password: &str) -> Result<(), StorageError> {
        if email.is_empty() || password.is_empty() {
            return Err(StorageError::rejected(
                "email and password must be non-empty to log in",
            ));
        }

        let batch = WriteBatch::new()
            .put(KEY_IS_LOGGED_IN, true)
            .put(KEY_USER_EMAIL, email)
            .put(KEY_USER_PASSWORD, password);

        let mut storage = self.storage.lock().await;
        storage.apply(batch)?;
        self.logged_in.send_if_modified(|current| replace_if_changed(current, true));
        self.email
            .send_if_modified(|current| replace_if_changed(current, email.to_string()));

        info!("Credentials saved for {}", email);
        Ok(())
    }

    /// Clear the logged-in flag, keeping email and password for the next login
    pub async fn logout(&self) -> Result<(), StorageError> {
        let mut storage = self.storage.lock().await;
        storage.apply(WriteBatch::new().put(KEY_IS_LOGGED_IN, false))?;
        self.logged_in.send_if_modified(|current| replace_if_changed(current, false));

        info!("Logged out");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// The stored `(email, password)` pair
    ///
    /// `None` when either field was never written or when the backend fails;
    /// a backend fault is logged and not surfaced.
    pub async fn get_stored_credentials(&self) -> Option<(String, String)> {
        let storage = self.storage.lock().await;
        match read_credentials(&**storage) {
            Ok(credentials) => credentials,
            Err(e) => {
                warn!("Failed to read stored credentials: {}", e);
                None
            }
        }
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("is_logged_in", &self.is_logged_in())
            .field("email", &self.current_email())
            .finish_non_exhaustive()
    }
}

// ----------------------------------------------------------------------------
// Helper Functions
// ----------------------------------------------------------------------------

fn read_credentials(storage: &dyn KeyValueStore) -> Result<Option<(String, String)>, StorageError> {
    let email = storage.retrieve(KEY_USER_EMAIL)?;
    let password = storage.retrieve(KEY_USER_PASSWORD)?;

    match (email, password) {
        (Some(email), Some(password)) => Ok(Some((
            into_text(KEY_USER_EMAIL, email)?,
            into_text(KEY_USER_PASSWORD, password)?,
        ))),
        _ => Ok(None),
    }
}

fn into_text(key: &str, value: StoredValue) -> Result<String, StorageError> {
    match value {
        StoredValue::Text(text) => Ok(text),
        StoredValue::Bool(_) => Err(StorageError::TypeMismatch {
            key: key.to_string(),
            expected: "string",
        }),
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
