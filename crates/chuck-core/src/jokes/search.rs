//! Text search over the joke API

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use super::client::JokeApi;
use super::model::Joke;
use crate::validation::is_blank;
use crate::view_state::ViewState;

/// Search query, progress flags and the latest result list
pub struct JokeSearch<A: JokeApi> {
    api: Arc<A>,
    results: watch::Sender<ViewState<Vec<Joke>>>,
    is_searching: watch::Sender<bool>,
    has_searched: watch::Sender<bool>,
    current_query: watch::Sender<String>,
}

impl<A: JokeApi> JokeSearch<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            results: watch::channel(ViewState::Loading).0,
            is_searching: watch::channel(false).0,
            has_searched: watch::channel(false).0,
            current_query: watch::channel(String::new()).0,
        }
    }

    pub fn results(&self) -> watch::Receiver<ViewState<Vec<Joke>>> {
        self.results.subscribe()
    }

    pub fn is_searching(&self) -> watch::Receiver<bool> {
        self.is_searching.subscribe()
    }

    pub fn has_searched(&self) -> watch::Receiver<bool> {
        self.has_searched.subscribe()
    }

    pub fn current_query(&self) -> watch::Receiver<String> {
        self.current_query.subscribe()
    }

    /// Run a search for `query`; blank queries are ignored
    pub async fn search(&self, query: &str) {
        if is_blank(query) {
            return;
        }

        self.is_searching.send_replace(true);
        self.has_searched.send_replace(true);
        self.current_query.send_replace(query.to_string());
        self.results.send_replace(ViewState::Loading);

        let state = match self.api.search_jokes(query).await {
            Ok(results) if results.matches.is_empty() => {
                ViewState::error(format!("No jokes found for \"{query}\""))
            }
            Ok(results) => {
                debug!("Showing {} of {} matches", results.matches.len(), results.total);
                ViewState::Success(results.matches)
            }
            Err(e) => ViewState::error(e.to_string()),
        };
        self.results.send_replace(state);
        self.is_searching.send_replace(false);
    }

    /// Forget the current query and results
    pub fn clear_search(&self) {
        self.results.send_replace(ViewState::Loading);
        self.has_searched.send_replace(false);
        self.current_query.send_replace(String::new());
    }

    pub async fn retry_search(&self) {
        let query = self.current_query.borrow().clone();
        self.search(&query).await;
    }
}
