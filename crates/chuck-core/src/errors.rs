//! Error types for the Chuck client
//!
//! This module contains the error types used throughout the core crate:
//! storage faults from the persistence layer, authentication failures from the
//! session service, joke API failures, and the `ChuckError` type that unifies
//! them all.

// ----------------------------------------------------------------------------
// Specific Error Types
// ----------------------------------------------------------------------------

/// Faults raised by a key-value persistence backend
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage not available")]
    NotAvailable,
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Stored value for '{key}' has unexpected type (expected {expected})")]
    TypeMismatch { key: String, expected: &'static str },
    #[error("Write rejected: {reason}")]
    Rejected { reason: String },
}

/// Failures of the login/registration flow
///
/// The display strings are user-facing and are shown as-is.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email format")]
    InvalidEmailFormat,
    #[error("Password cannot be empty")]
    EmptyPassword,
    #[error("Password must be at least {min_length} characters")]
    PasswordTooShort { min_length: usize },
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("No account found. Please register first.")]
    NoAccountFound,
    #[error("Invalid email or password")]
    CredentialMismatch,
    #[error("Failed to persist credentials: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Input-shape failures that the user fixes by editing the form
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidEmailFormat
                | AuthError::EmptyPassword
                | AuthError::PasswordTooShort { .. }
                | AuthError::PasswordMismatch
        )
    }
}

/// Failures of the joke API client
#[derive(Debug, thiserror::Error)]
pub enum JokeApiError {
    /// Network, HTTP status or body decoding fault; message kept verbatim
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("Search query cannot be blank")]
    EmptyQuery,
    #[error("Invalid API base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

// ----------------------------------------------------------------------------
// Unified Error
// ----------------------------------------------------------------------------

/// Core error type for the Chuck client
#[derive(Debug, thiserror::Error)]
pub enum ChuckError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("{0}")]
    JokeApi(#[from] JokeApiError),

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },
}

// ----------------------------------------------------------------------------
// Convenience Error Constructors
// ----------------------------------------------------------------------------

impl ChuckError {
    /// Create a configuration error with a reason
    pub fn config_error<T: Into<String>>(reason: T) -> Self {
        ChuckError::Configuration {
            reason: reason.into(),
        }
    }
}

impl StorageError {
    /// Create a rejected-write error with a reason
    pub fn rejected<T: Into<String>>(reason: T) -> Self {
        StorageError::Rejected {
            reason: reason.into(),
        }
    }
}

// ----------------------------------------------------------------------------
// Type Aliases
// ----------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, ChuckError>;
