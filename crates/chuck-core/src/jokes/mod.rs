//! Joke API access and the presentation state built on it

pub mod client;
pub mod feed;
pub mod model;
pub mod search;

pub use client::{JokeApi, JokeClient};
pub use feed::JokeFeed;
pub use model::{Joke, SearchResults};
pub use search::JokeSearch;
