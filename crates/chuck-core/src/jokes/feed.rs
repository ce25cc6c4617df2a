//! Random-joke feed with optional category filter

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use super::client::JokeApi;
use super::model::Joke;
use crate::view_state::ViewState;

/// Current joke, category list and category selection for a joke screen
///
/// Each load publishes `Loading` and then the outcome. A result that arrives
/// after a newer request started still overwrites the state; callers that
/// care drop the superseded future.
pub struct JokeFeed<A: JokeApi> {
    api: Arc<A>,
    joke: watch::Sender<ViewState<Joke>>,
    categories: watch::Sender<ViewState<Vec<String>>>,
    selected_category: watch::Sender<Option<String>>,
    is_refreshing: watch::Sender<bool>,
}

impl<A: JokeApi> JokeFeed<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            joke: watch::channel(ViewState::Loading).0,
            categories: watch::channel(ViewState::Loading).0,
            selected_category: watch::channel(None).0,
            is_refreshing: watch::channel(false).0,
        }
    }

    // ------------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------------

    pub fn joke_state(&self) -> watch::Receiver<ViewState<Joke>> {
        self.joke.subscribe()
    }

    pub fn categories_state(&self) -> watch::Receiver<ViewState<Vec<String>>> {
        self.categories.subscribe()
    }

    pub fn selected_category(&self) -> watch::Receiver<Option<String>> {
        self.selected_category.subscribe()
    }

    pub fn is_refreshing(&self) -> watch::Receiver<bool> {
        self.is_refreshing.subscribe()
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    /// Load categories and a first random joke
    pub async fn start(&self) {
        self.load_categories().await;
        self.load_random_joke().await;
    }

    pub async fn load_random_joke(&self) {
        self.joke.send_replace(ViewState::Loading);
        let result = self.api.get_random_joke().await;
        self.joke.send_replace(ViewState::from_result(result));
    }

    /// Select `category` and load a joke from it
    pub async fn load_random_joke_by_category(&self, category: &str) {
        self.joke.send_replace(ViewState::Loading);
        self.selected_category.send_replace(Some(category.to_string()));
        debug!("Loading joke from category {}", category);
        let result = self.api.get_random_joke_by_category(category).await;
        self.joke.send_replace(ViewState::from_result(result));
    }

    pub async fn load_categories(&self) {
        self.categories.send_replace(ViewState::Loading);
        let result = self.api.get_categories().await;
        self.categories.send_replace(ViewState::from_result(result));
    }

    /// Reload the joke for the current selection while flagging a refresh
    pub async fn refresh_joke(&self) {
        self.is_refreshing.send_replace(true);
        self.reload_current().await;
        self.is_refreshing.send_replace(false);
    }

    /// Drop the category filter and load an unfiltered joke
    pub async fn clear_category_selection(&self) {
        self.selected_category.send_replace(None);
        self.load_random_joke().await;
    }

    /// Repeat the last joke load for the current selection
    pub async fn retry_last_action(&self) {
        self.reload_current().await;
    }

    async fn reload_current(&self) {
        let category = self.selected_category.borrow().clone();
        match category {
            Some(category) => self.load_random_joke_by_category(&category).await,
            None => self.load_random_joke().await,
        }
    }
}
