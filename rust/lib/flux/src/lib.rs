//! Flux: client state engine.
//!
//! Rust owns every screen's state and logic; a renderer only reads paths
//! and emits requests.
//!
//! - `get(path)` / `read::<T>(path)`: current state at a path
//! - `emit(path, payload)`: route a typed request to its handler(s)
//! - `subscribe(pattern)`: observe writes under a pattern
//!
//! Paths are `/`-separated (`auth/state`, `users/console`). Patterns
//! accept `+` (one level) and `#` (rest of the path).

pub mod app;
pub mod i18n;
pub mod pattern;
pub mod router;
pub mod store;
pub mod value;

pub use app::Flux;
pub use i18n::{I18nHandler, I18nStore, QueryParams};
pub use router::{BoxFuture, Payload, Router};
pub use store::{ChangeHandler, StateStore};
pub use value::{StateValue, SubscriptionId};
