//! HTTP client for the Chuck Norris joke API
//!
//! A thin typed wrapper: one GET per operation, no retries, no pagination and
//! no timeout beyond the transport default. Any transport, status or decoding
//! failure comes back as [`JokeApiError::Transport`].

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::model::{Joke, JokeDto, SearchResponseDto, SearchResults};
use crate::config::ApiConfig;
use crate::errors::JokeApiError;
use crate::validation::is_blank;

const RANDOM_PATH: &str = "jokes/random";
const CATEGORIES_PATH: &str = "jokes/categories";
const SEARCH_PATH: &str = "jokes/search";

// ----------------------------------------------------------------------------
// Joke API Trait
// ----------------------------------------------------------------------------

/// Read-only operations offered by the joke API
#[async_trait]
pub trait JokeApi: Send + Sync {
    /// A random joke from any category
    async fn get_random_joke(&self) -> Result<Joke, JokeApiError>;

    /// All category names, in API order
    async fn get_categories(&self) -> Result<Vec<String>, JokeApiError>;

    /// A random joke from `category`
    async fn get_random_joke_by_category(&self, category: &str) -> Result<Joke, JokeApiError>;

    /// Jokes whose text matches `query`; a blank query is rejected without a request
    async fn search_jokes(&self, query: &str) -> Result<SearchResults, JokeApiError>;
}

// ----------------------------------------------------------------------------
// HTTP Implementation
// ----------------------------------------------------------------------------

/// [`JokeApi`] over HTTP with `reqwest`
#[derive(Debug, Clone)]
pub struct JokeClient {
    http: Client,
    base_url: Url,
}

impl JokeClient {
    pub fn new(config: &ApiConfig) -> Result<Self, JokeApiError> {
        let base_url = config
            .parsed_base_url()
            .map_err(|source| JokeApiError::InvalidBaseUrl {
                url: config.base_url.clone(),
                source,
            })?;
        let http = Client::builder().user_agent(config.user_agent.as_str()).build()?;

        Ok(Self { http, base_url })
    }

    /// Client with default settings against `base_url`
    pub fn with_base_url(base_url: &str) -> Result<Self, JokeApiError> {
        Self::new(&ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, JokeApiError> {
        self.base_url
            .join(path)
            .map_err(|source| JokeApiError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                source,
            })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<(&str, &str)>,
    ) -> Result<T, JokeApiError> {
        let url = self.endpoint(path)?;
        let mut request = self.http.get(url.clone());
        if let Some(pair) = query {
            request = request.query(&[pair]);
        }

        debug!("GET {}", url);
        let response = request.send().await?.error_for_status()?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl JokeApi for JokeClient {
    async fn get_random_joke(&self) -> Result<Joke, JokeApiError> {
        let dto: JokeDto = self.get_json(RANDOM_PATH, None).await?;
        Ok(dto.into())
    }

    async fn get_categories(&self) -> Result<Vec<String>, JokeApiError> {
        self.get_json(CATEGORIES_PATH, None).await
    }

    async fn get_random_joke_by_category(&self, category: &str) -> Result<Joke, JokeApiError> {
        let dto: JokeDto = self.get_json(RANDOM_PATH, Some(("category", category))).await?;
        Ok(dto.into())
    }

    async fn search_jokes(&self, query: &str) -> Result<SearchResults, JokeApiError> {
        if is_blank(query) {
            return Err(JokeApiError::EmptyQuery);
        }
        let dto: SearchResponseDto = self.get_json(SEARCH_PATH, Some(("query", query))).await?;
        let results = SearchResults::from(dto);
        debug!("Search for {:?} matched {} jokes", query, results.total);
        Ok(results)
    }
}
