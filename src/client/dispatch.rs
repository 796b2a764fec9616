//! Authenticated request dispatch with a bounded single-retry policy.

// self
use crate::{
	_prelude::*,
	client::{ExchangeClient, common},
	http::{ApiRequest, ApiResponse, HttpTransport, Method},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	store::TokenStore,
};

/// Maximum dispatch attempts: the initial request plus one retry after a
/// token-expiry rejection. The counter guarantees termination; there is no
/// open-ended catch-and-retry here.
const MAX_ATTEMPTS: u8 = 2;

impl<T> ExchangeClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Sends an authenticated request, refreshing the bearer token at most
	/// once.
	///
	/// The token travels in `Authorization: Bearer <token>`. A token-expiry
	/// rejection invalidates the cached token and triggers exactly one retry
	/// with a freshly obtained one; a second rejection of the same kind is
	/// surfaced unchanged. Every other failure (auth or HTTP-level) is
	/// surfaced without retry, including rate limits, which callers must
	/// handle by backing off.
	pub async fn send(
		&self,
		method: Method,
		path: &str,
		body: impl Into<String>,
	) -> Result<ApiResponse> {
		const KIND: FlowKind = FlowKind::Dispatch;

		let span = FlowSpan::new(KIND, "send");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let body = body.into();
		let result = span
			.instrument(async move {
				for attempt in 0..MAX_ATTEMPTS {
					let token = self.get_token().await?;
					let request = ApiRequest::new(method, self.descriptor.endpoint_url(path)?)
						.with_header(
							common::HEADER_AUTHORIZATION,
							format!("Bearer {}", token.value.expose()),
						)
						.with_header("Content-Type", "application/json")
						.with_body(body.clone())
						.with_timeout(self.timeout);
					let response = self.transport.execute(request).await.map_err(Error::from)?;

					if response.is_success() {
						return Ok(response);
					}

					let error = common::classify_rejection(&response);

					if error.is_token_expired() && attempt + 1 < MAX_ATTEMPTS {
						// Drop the stale token; the next get_token call
						// refreshes through the coalesced path.
						<dyn TokenStore>::invalidate(self.store.as_ref(), &self.credential.key)
							.await
							.map_err(Error::from)?;

						continue;
					}

					return Err(error);
				}

				unreachable!("Dispatch loop returns within MAX_ATTEMPTS iterations.")
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Probes the service's unauthenticated health endpoint.
	pub async fn health(&self) -> Result<ApiResponse> {
		let request =
			ApiRequest::new(Method::Get, self.descriptor.endpoint_url(common::HEALTH_PATH)?)
				.with_timeout(self.timeout);
		let response = self.transport.execute(request).await.map_err(Error::from)?;

		if response.is_success() {
			Ok(response)
		} else {
			Err(common::classify_rejection(&response))
		}
	}
}
