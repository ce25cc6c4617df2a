//! Command handlers for the Chuck CLI

use std::sync::Arc;

use tracing::info;

use chuck_core::{Joke, JokeApi, JokeFeed, JokeSearch, ViewState};

use crate::app::ChuckApp;
use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};

/// Command dispatcher for handling CLI commands
pub struct CommandDispatcher;

impl CommandDispatcher {
    /// Execute a CLI command
    pub async fn execute(cli: Cli, app: ChuckApp) -> Result<()> {
        match cli.command {
            Commands::Register {
                email,
                password,
                confirm,
            } => Self::handle_register_command(&app, &email, &password, &confirm).await,
            Commands::Login { email, password } => {
                Self::handle_login_command(&app, &email, &password).await
            }
            Commands::Logout => Self::handle_logout_command(&app).await,
            Commands::Status => Self::handle_status_command(&app),
            Commands::Random { category } => {
                Self::handle_random_command(app.jokes()?, category).await
            }
            Commands::Categories => Self::handle_categories_command(app.jokes()?).await,
            Commands::Search { query } => Self::handle_search_command(app.jokes()?, &query).await,
        }
    }

    async fn handle_register_command(
        app: &ChuckApp,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<()> {
        app.session().register(email, password, confirm).await?;
        println!("Registered and logged in as {}", email);
        Ok(())
    }

    async fn handle_login_command(app: &ChuckApp, email: &str, password: &str) -> Result<()> {
        app.session().login(email, password).await?;
        println!("Logged in as {}", email);
        Ok(())
    }

    async fn handle_logout_command(app: &ChuckApp) -> Result<()> {
        app.session().logout().await;
        if app.session_state().is_logged_in {
            return Err(CliError::Request("Logout could not be saved".to_string()));
        }
        println!("Logged out");
        Ok(())
    }

    fn handle_status_command(app: &ChuckApp) -> Result<()> {
        let state = app.session_state();
        println!("Chuck Session Status");
        println!("====================");
        if state.is_logged_in {
            println!("Logged in as: {}", state.user_email);
        } else if state.user_email.is_empty() {
            println!("Logged out (no account registered)");
        } else {
            println!("Logged out (account: {})", state.user_email);
        }

        let config = app.config();
        println!("\nJoke API: {}", config.core.api.base_url);
        if let Some(dir) = &config.core.storage.data_dir {
            println!("Data directory: {}", dir.display());
        }
        Ok(())
    }

    /// Print a joke through the feed so errors read the same as in the UI state
    async fn handle_random_command<A: JokeApi>(api: Arc<A>, category: Option<String>) -> Result<()> {
        let feed = JokeFeed::new(api);
        match category.as_deref() {
            Some(category) => feed.load_random_joke_by_category(category).await,
            None => feed.load_random_joke().await,
        }

        let state = feed.joke_state().borrow().clone();
        print_joke(&into_result(state)?);
        Ok(())
    }

    async fn handle_categories_command<A: JokeApi>(api: Arc<A>) -> Result<()> {
        let feed = JokeFeed::new(api);
        feed.load_categories().await;

        let state = feed.categories_state().borrow().clone();
        for category in into_result(state)? {
            println!("{}", category);
        }
        Ok(())
    }

    async fn handle_search_command<A: JokeApi>(api: Arc<A>, query: &str) -> Result<()> {
        let search = JokeSearch::new(api);
        search.search(query).await;
        if !*search.has_searched().borrow() {
            return Err(CliError::JokeApi(chuck_core::JokeApiError::EmptyQuery));
        }

        let state = search.results().borrow().clone();
        let jokes = into_result(state)?;
        info!("{} jokes matched {:?}", jokes.len(), query);
        for joke in &jokes {
            print_joke(joke);
        }
        Ok(())
    }
}

fn into_result<T>(state: ViewState<T>) -> Result<T> {
    match state {
        ViewState::Success(value) => Ok(value),
        ViewState::Error { message } => Err(CliError::Request(message)),
        ViewState::Loading => Err(CliError::Request("Request did not complete".to_string())),
    }
}

fn print_joke(joke: &Joke) {
    println!("{}", joke.value);
    if !joke.categories.is_empty() {
        println!("  [{}]", joke.categories.join(", "));
    }
    println!("  {}", joke.url);
}
