//! Storage contracts and the built-in in-memory token cache.
//!
//! Tokens are cached per API key and overwritten (never appended) on each
//! successful refresh. The cache is an explicitly owned, injectable object so
//! tests can construct isolated instances per credential; nothing in this
//! crate persists a bearer token to disk.

pub mod memory;

pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::AccessToken, auth::ApiKey};

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Cache lifecycle for one credential's token slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheState {
	/// No token has been issued (or the slot was explicitly invalidated).
	Empty,
	/// A token is cached and valid at the observed instant.
	Valid,
	/// A token is cached but its expiry instant has been reached.
	Expired,
}

/// Computes the cache state for a fetched slot at the observed instant.
pub fn cache_state(record: Option<&AccessToken>, now: OffsetDateTime) -> CacheState {
	match record {
		None => CacheState::Empty,
		Some(token) if token.is_valid_at(now) => CacheState::Valid,
		Some(_) => CacheState::Expired,
	}
}

/// Cache backend contract implemented by token stores.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Persists or replaces the token cached for the provided API key.
	fn save(&self, key: ApiKey, token: AccessToken) -> StoreFuture<'_, ()>;

	/// Fetches the token cached for the API key, if present.
	fn fetch<'a>(&'a self, key: &'a ApiKey) -> StoreFuture<'a, Option<AccessToken>>;

	/// Clears the slot (e.g., after the service rejects the token as revoked),
	/// returning the evicted record.
	fn invalidate<'a>(&'a self, key: &'a ApiKey) -> StoreFuture<'a, Option<AccessToken>>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
