//! HTTP clients for the HR backend.
//!
//! - [`IdentityClient`]: credential exchange, recovery codes, password reset
//! - [`UserDirectoryClient`]: paginated listing and CRUD of managed users
//!
//! Authentication follows the `TokenSource` pattern: the identity client
//! writes the session token into a [`TokenStore`], and the directory client
//! reads it back through [`PersistedToken`] before every request.
//!
//! ```ignore
//! let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new("~/.pointer/token"));
//! let identity = IdentityClient::new("http://localhost:8082", tokens.clone())?;
//! identity.login("ana@empresa.com", "secret").await?;
//!
//! let users = UserDirectoryClient::new(
//!     "http://localhost:8082",
//!     Arc::new(PersistedToken::new(tokens)),
//! )?;
//! let page = users.list(0, 10, &UserFilters::default()).await?;
//! ```

pub mod error;
pub mod http;
pub mod identity;
pub mod model;
pub mod token;
pub mod users;

pub use error::{error_code, ApiError};
pub use identity::{IdentityClient, DEFAULT_CLIENT_ID, DEFAULT_DISABLED_STATUSES};
pub use model::{
    Identity, ManagedUser, Role, UserDraft, UserFilters, UserPage, UserStatus, UserType,
};
pub use token::{
    decode_token, FileTokenStore, MemoryTokenStore, PersistedToken, TokenSource, TokenStore,
};
pub use users::{EmailProbe, UserDirectoryClient};
