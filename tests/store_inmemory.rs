// crates.io
use time::macros;
// self
use hmac_exchange::{
	_preludet::*,
	auth::{AccessToken, ApiKey, ClientId},
	store::{CacheState, MemoryStore, TokenStore, cache_state},
};

fn key(value: &str) -> ApiKey {
	ApiKey::new(value).expect("API key fixture should be valid.")
}

fn token(value: &str, expires_in: Duration) -> AccessToken {
	AccessToken::builder(ClientId::new("dashboard-client").expect("Client fixture should be valid."))
		.value(value)
		.client_name("Dashboard Client")
		.issued_at(macros::datetime!(2025-01-01 00:00 UTC))
		.expires_in(expires_in)
		.build()
		.expect("Token fixture should build.")
}

#[tokio::test]
async fn save_fetch_invalidate_round_trip() {
	let store = MemoryStore::default();
	let key = key("key-round-trip");

	assert!(store.fetch(&key).await.expect("Fetch should succeed.").is_none());

	store
		.save(key.clone(), token("stored-token", Duration::hours(1)))
		.await
		.expect("Save should succeed.");

	let fetched = store
		.fetch(&key)
		.await
		.expect("Fetch should succeed.")
		.expect("Token should be cached.");

	assert_eq!(fetched.value.expose(), "stored-token");

	let evicted = store
		.invalidate(&key)
		.await
		.expect("Invalidation should succeed.")
		.expect("Eviction should return the record.");

	assert_eq!(evicted.value.expose(), "stored-token");
	assert!(store.fetch(&key).await.expect("Fetch should succeed.").is_none());
}

#[tokio::test]
async fn saves_replace_rather_than_append() {
	let store = MemoryStore::default();
	let key = key("key-replace");

	store
		.save(key.clone(), token("original-token", Duration::hours(1)))
		.await
		.expect("First save should succeed.");
	store
		.save(key.clone(), token("replacement-token", Duration::hours(2)))
		.await
		.expect("Second save should succeed.");

	let fetched = store
		.fetch(&key)
		.await
		.expect("Fetch should succeed.")
		.expect("Token should be cached.");

	assert_eq!(fetched.value.expose(), "replacement-token");
}

#[tokio::test]
async fn slots_are_isolated_per_api_key() {
	let store = MemoryStore::default();
	let first = key("key-first");
	let second = key("key-second");

	store
		.save(first.clone(), token("first-token", Duration::hours(1)))
		.await
		.expect("Save should succeed.");

	assert!(store.fetch(&second).await.expect("Fetch should succeed.").is_none());

	store.invalidate(&second).await.expect("Invalidating an empty slot should succeed.");

	let untouched = store
		.fetch(&first)
		.await
		.expect("Fetch should succeed.")
		.expect("Other slots should be untouched.");

	assert_eq!(untouched.value.expose(), "first-token");
}

#[test]
fn cache_state_tracks_the_observed_instant() {
	let now = macros::datetime!(2025-01-01 00:00 UTC);
	let record = token("stored-token", Duration::minutes(30));

	assert_eq!(cache_state(None, now), CacheState::Empty);
	assert_eq!(cache_state(Some(&record), now), CacheState::Valid);
	assert_eq!(cache_state(Some(&record), now + Duration::minutes(30)), CacheState::Expired);
}
