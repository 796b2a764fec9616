//! High-level signed exchange client with caching + singleflight guards.

pub mod common;

mod dispatch;
mod exchange;

pub use common::*;

// std
use std::time::Duration as StdDuration;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ApiKey, Credential},
	clock::{Clock, SystemClock},
	http::HttpTransport,
	service::ServiceDescriptor,
	store::{CacheState, TokenStore, cache_state},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestExchangeClient = ExchangeClient<ReqwestHttpTransport>;

/// Coordinates signed token exchanges and authenticated dispatch for a single
/// credential against a single service descriptor.
///
/// The client owns the HTTP transport, token store, clock, descriptor, and
/// credential so the exchange and dispatch implementations can focus on
/// protocol logic (canonical signing, response classification, bounded
/// retries). The credential is read-only after construction and its secret is
/// redacted from all diagnostic output.
#[derive(Clone)]
pub struct ExchangeClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// HTTP transport used for every outbound service request.
	pub transport: Arc<T>,
	/// Token store that caches issued bearer tokens per API key.
	pub store: Arc<dyn TokenStore>,
	/// Time source for signing timestamps and expiry checks.
	pub clock: Arc<dyn Clock>,
	/// Service descriptor that defines endpoints and protocol tolerances.
	pub descriptor: ServiceDescriptor,
	/// API credential used to sign token requests.
	pub credential: Credential,
	/// Caller-supplied deadline applied to each network call.
	pub timeout: Option<StdDuration>,
	refresh_guards: Arc<Mutex<HashMap<ApiKey, Arc<AsyncMutex<()>>>>>,
}
impl<T> ExchangeClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(
		store: Arc<dyn TokenStore>,
		descriptor: ServiceDescriptor,
		credential: Credential,
		transport: impl Into<Arc<T>>,
	) -> Self {
		Self {
			transport: transport.into(),
			store,
			clock: Arc::new(SystemClock),
			descriptor,
			credential,
			timeout: None,
			refresh_guards: Default::default(),
		}
	}

	/// Sets or replaces the deadline applied to each network call.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Replaces the time source (tests inject a manual clock here).
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}

	/// Returns a valid bearer token, refreshing through the coalesced path
	/// when the cached one is missing or expired.
	///
	/// Concurrent callers for the same credential serialize on a per-key
	/// guard: the first caller performs the exchange while the rest wait and
	/// then reuse the freshly cached token, so N concurrent calls produce one
	/// network request. When a coalesced refresh fails (for example the token
	/// endpoint answers 429), the failure goes only to the caller whose
	/// exchange failed; waiters re-check the store once they acquire the guard
	/// and attempt their own exchange in turn, so the endpoint sees serialized
	/// attempts instead of a fanned-out copy of the error.
	pub async fn get_token(&self) -> Result<AccessToken> {
		let guard = self.refresh_guard(&self.credential.key);
		let _singleflight = guard.lock().await;
		let now = self.clock.now();

		if let Some(token) = <dyn TokenStore>::fetch(self.store.as_ref(), &self.credential.key)
			.await
			.map_err(Error::from)?
			.filter(|token| token.is_valid_at(now))
		{
			return Ok(token);
		}

		// The store is written only after a successful exchange, so a caller
		// that abandons this future mid-refresh leaves the previous state
		// (empty or the prior token) intact.
		let token = self.request_token().await?;

		<dyn TokenStore>::save(self.store.as_ref(), self.credential.key.clone(), token.clone())
			.await
			.map_err(Error::from)?;

		Ok(token)
	}

	/// Drops the cached token for this credential, returning the evicted
	/// record.
	pub async fn invalidate_token(&self) -> Result<Option<AccessToken>> {
		<dyn TokenStore>::invalidate(self.store.as_ref(), &self.credential.key)
			.await
			.map_err(Error::from)
	}

	/// Reports the cache state for this credential at the current clock
	/// instant.
	pub async fn token_state(&self) -> Result<CacheState> {
		let now = self.clock.now();
		let record = <dyn TokenStore>::fetch(self.store.as_ref(), &self.credential.key)
			.await
			.map_err(Error::from)?;

		Ok(cache_state(record.as_ref(), now))
	}

	/// Returns (and creates on demand) the singleflight guard for an API key.
	fn refresh_guard(&self, key: &ApiKey) -> Arc<AsyncMutex<()>> {
		let mut guards = self.refresh_guards.lock();

		guards.entry(key.clone()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
	}
}
impl<T> Debug for ExchangeClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ExchangeClient")
			.field("descriptor", &self.descriptor)
			.field("credential", &self.credential)
			.field("timeout", &self.timeout)
			.finish()
	}
}
#[cfg(feature = "reqwest")]
impl ExchangeClient<ReqwestHttpTransport> {
	/// Creates a new client for the provided descriptor and credential.
	///
	/// The client provisions its own reqwest-backed transport so callers do
	/// not need to pass HTTP handles explicitly. Use
	/// [`ExchangeClient::with_timeout`] to bound each network call.
	pub fn new(
		store: Arc<dyn TokenStore>,
		descriptor: ServiceDescriptor,
		credential: Credential,
	) -> Self {
		Self::with_transport(store, descriptor, credential, ReqwestHttpTransport::default())
	}
}
