//! Signed credential exchange at the token endpoint.
//!
//! The exchange captures one timestamp, signs the token endpoint's fixed
//! method/path with an empty body, and trades the three protocol headers for a
//! short-lived bearer token. Authentication rejections are never retried here;
//! that decision belongs to the caller (the dispatcher retries token expiry
//! exactly once, everything else surfaces immediately).

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ClientId},
	client::{ExchangeClient, common},
	error::ConfigError,
	http::{ApiRequest, HttpTransport, Method},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	sign,
};

/// Success payload returned by the token endpoint.
#[derive(Clone, Debug, Deserialize)]
struct TokenGrant {
	access_token: String,
	token_type: String,
	expires_in: u64,
	client_id: ClientId,
	client_name: String,
}

impl<T> ExchangeClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Exchanges the HMAC credential for a fresh bearer token.
	///
	/// Bypasses the cache entirely; use
	/// [`get_token`](ExchangeClient::get_token) for the cached, coalesced
	/// path.
	pub async fn request_token(&self) -> Result<AccessToken> {
		const KIND: FlowKind = FlowKind::TokenExchange;

		let span = FlowSpan::new(KIND, "request_token");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let issued_at = self.clock.now();
				let timestamp = sign::unix_timestamp_string(issued_at);
				let signature = sign::sign(
					self.credential.secret.expose(),
					Method::Post.as_str(),
					&self.descriptor.token_path,
					&timestamp,
					"",
				);
				let request = ApiRequest::new(Method::Post, self.descriptor.token_url()?)
					.with_header(common::HEADER_API_KEY, self.credential.key.as_ref())
					.with_header(common::HEADER_SIGNATURE, signature)
					.with_header(common::HEADER_TIMESTAMP, timestamp)
					.with_header("Content-Type", "application/json")
					.with_timeout(self.timeout);
				let response = self.transport.execute(request).await.map_err(Error::from)?;

				if !response.is_success() {
					return Err(common::classify_rejection(&response));
				}

				let grant: TokenGrant = common::parse_json(&response)?;
				let expires_in = i64::try_from(grant.expires_in)
					.map_err(|_| ConfigError::ExpiresInOutOfRange)?;

				// expires_in = 0 is a legal grant that is expired on arrival;
				// the cache treats it exactly like any other stale token.
				AccessToken::builder(grant.client_id)
					.value(grant.access_token)
					.token_type(grant.token_type)
					.client_name(grant.client_name)
					.issued_at(issued_at)
					.expires_in(Duration::seconds(expires_in))
					.build()
					.map_err(|e| ConfigError::from(e).into())
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}
