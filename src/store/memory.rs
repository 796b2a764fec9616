//! Thread-safe in-memory [`TokenStore`] implementation.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ApiKey},
	store::{StoreError, StoreFuture, TokenStore},
};

type StoreMap = Arc<RwLock<HashMap<ApiKey, AccessToken>>>;

/// Thread-safe cache backend that keeps tokens in-process.
///
/// This is the production backend as well as the test one: the protocol's
/// tokens are short-lived and deliberately discarded on process exit.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	fn save_now(map: StoreMap, key: ApiKey, token: AccessToken) -> Result<(), StoreError> {
		map.write().insert(key, token);

		Ok(())
	}

	fn fetch_now(map: StoreMap, key: ApiKey) -> Option<AccessToken> {
		map.read().get(&key).cloned()
	}

	fn invalidate_now(map: StoreMap, key: ApiKey) -> Option<AccessToken> {
		map.write().remove(&key)
	}
}
impl TokenStore for MemoryStore {
	fn save(&self, key: ApiKey, token: AccessToken) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::save_now(map, key, token) })
	}

	fn fetch<'a>(&'a self, key: &'a ApiKey) -> StoreFuture<'a, Option<AccessToken>> {
		let map = self.0.clone();
		let key = key.to_owned();

		Box::pin(async move { Ok(Self::fetch_now(map, key)) })
	}

	fn invalidate<'a>(&'a self, key: &'a ApiKey) -> StoreFuture<'a, Option<AccessToken>> {
		let map = self.0.clone();
		let key = key.to_owned();

		Box::pin(async move { Ok(Self::invalidate_now(map, key)) })
	}
}
