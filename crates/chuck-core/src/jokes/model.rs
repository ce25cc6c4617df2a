//! Joke records and their wire format

use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Domain Types
// ----------------------------------------------------------------------------

/// A joke as returned by the API, immutable once fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joke {
    pub id: String,
    /// Joke text
    pub value: String,
    /// Ordered category names, possibly empty
    pub categories: Vec<String>,
    pub icon_url: String,
    pub url: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Result of a text search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub matches: Vec<Joke>,
    /// Total reported by the API
    pub total: u64,
}

// ----------------------------------------------------------------------------
// Wire Format
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct JokeDto {
    #[serde(default)]
    categories: Vec<String>,
    created_at: String,
    icon_url: String,
    id: String,
    updated_at: String,
    url: String,
    value: String,
}

impl From<JokeDto> for Joke {
    fn from(dto: JokeDto) -> Self {
        Self {
            id: dto.id,
            value: dto.value,
            categories: dto.categories,
            icon_url: dto.icon_url,
            url: dto.url,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponseDto {
    result: Vec<JokeDto>,
    total: u64,
}

impl From<SearchResponseDto> for SearchResults {
    fn from(dto: SearchResponseDto) -> Self {
        Self {
            matches: dto.result.into_iter().map(Joke::from).collect(),
            total: dto.total,
        }
    }
}
