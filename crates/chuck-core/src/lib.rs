//! Chuck Core
//!
//! Local credential persistence, the login/register session built on it, and a
//! typed client for the Chuck Norris joke API. There is no authentication
//! server: a single email/password pair is stored on the device and compared
//! on later logins.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod config;
pub mod credentials;
pub mod errors;
pub mod jokes;
pub mod session;
pub mod storage;
pub mod validation;
pub mod view_state;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use config::{ApiConfig, ChuckConfig, StorageConfig};
pub use credentials::CredentialStore;
pub use errors::{AuthError, ChuckError, JokeApiError, Result, StorageError};
pub use jokes::{Joke, JokeApi, JokeClient, JokeFeed, JokeSearch, SearchResults};
pub use session::{SessionPhase, SessionService, SessionState};
pub use storage::{
    create_default_storage, create_test_storage, FileStorage, KeyValueStore, MemoryStorage,
    StoredValue, WriteBatch,
};
pub use view_state::ViewState;
