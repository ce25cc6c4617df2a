//! Error handling for the Chuck CLI

use thiserror::Error;

use crate::config::ConfigError;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Auth(#[from] chuck_core::AuthError),

    #[error("{0}")]
    JokeApi(#[from] chuck_core::JokeApiError),

    #[error("Storage error: {0}")]
    Storage(#[from] chuck_core::StorageError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Not logged in. Run `chuck login` or `chuck register` first.")]
    NotLoggedIn,

    /// A joke view finished in its error state
    #[error("{0}")]
    Request(String),
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages_pass_through() {
        let err = CliError::from(chuck_core::AuthError::CredentialMismatch);
        assert_eq!(err.to_string(), "Invalid email or password");

        let err = CliError::from(ConfigError::Validation("bad url".to_string()));
        assert_eq!(err.to_string(), "Configuration validation error: bad url");
    }
}
