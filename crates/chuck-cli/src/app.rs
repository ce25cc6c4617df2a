//! Chuck application wiring
//!
//! Builds the credential store, session service and joke client from an
//! [`AppConfig`] and hands them to the command handlers.

use std::sync::Arc;

use tracing::{debug, info};

use chuck_core::{
    create_default_storage, CredentialStore, JokeClient, SessionService, SessionState,
};

use crate::config::AppConfig;
use crate::error::{CliError, Result};

/// Services shared by every command
pub struct ChuckApp {
    config: AppConfig,
    session: SessionService,
    jokes: Arc<JokeClient>,
}

impl ChuckApp {
    /// Open durable storage and build the services; must run inside a Tokio runtime
    pub fn new(config: AppConfig) -> Result<Self> {
        let storage = create_default_storage(&config.core.storage)?;
        let store = Arc::new(CredentialStore::open(storage));
        debug!("Credential store: {:?}", store);

        let session = SessionService::new(store);
        let jokes = Arc::new(JokeClient::new(&config.core.api)?);
        info!("Using joke API at {}", jokes.base_url());

        Ok(Self {
            config,
            session,
            jokes,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionService {
        &self.session
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    /// Joke client, available only while logged in
    pub fn jokes(&self) -> Result<Arc<JokeClient>> {
        if !self.session.state().is_logged_in {
            return Err(CliError::NotLoggedIn);
        }
        Ok(Arc::clone(&self.jokes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn app(dir: &TempDir) -> ChuckApp {
        let mut config = AppConfig::default();
        config.core.storage.data_dir = Some(dir.path().to_path_buf());
        ChuckApp::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_jokes_require_login() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);
        assert!(matches!(app.jokes(), Err(CliError::NotLoggedIn)));

        app.session()
            .register("a@b.com", "secret1", "secret1")
            .await
            .unwrap();
        assert!(app.jokes().is_ok());
    }

    #[tokio::test]
    async fn test_corrupt_preferences_still_start() {
        let dir = TempDir::new().unwrap();
        let file_name = AppConfig::default().core.storage.file_name;
        std::fs::write(dir.path().join(&file_name), "{ not json").unwrap();

        let app = app(&dir);
        app.session()
            .register("a@b.com", "secret1", "secret1")
            .await
            .unwrap();
        app.session().login("a@b.com", "secret1").await.unwrap();
        assert!(app.jokes().is_ok());
    }

    #[tokio::test]
    async fn test_login_persists_between_runs() {
        let dir = TempDir::new().unwrap();
        app(&dir)
            .session()
            .register("a@b.com", "secret1", "secret1")
            .await
            .unwrap();

        let state = app(&dir).session_state();
        assert!(state.is_logged_in);
        assert_eq!(state.user_email, "a@b.com");
    }
}
