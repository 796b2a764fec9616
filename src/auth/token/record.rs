//! Immutable access token records, lifecycle helpers, and builders.

// self
use crate::{_prelude::*, auth::ClientId, auth::secret::TokenSecret};

/// Current lifecycle status for an access token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStatus {
	/// Token is valid strictly before its expiry instant.
	Valid,
	/// Token reached or passed its expiry instant.
	Expired,
}

/// Errors produced by [`AccessTokenBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum AccessTokenBuilderError {
	/// Issued when no token value was provided.
	#[error("Access token value is required.")]
	MissingValue,
	/// Issued when no expiry (absolute or relative) was configured.
	#[error("Expiry must be supplied via expires_at or expires_in.")]
	MissingExpiry,
	/// Issued when `issued_at + expires_in` overflows the representable range.
	#[error("Expiry instant exceeds the representable range.")]
	ExpiryOutOfRange,
}

/// Immutable record describing an issued bearer token.
///
/// A token with `expires_in = 0` is expired from the instant it was issued;
/// the builder accepts it so callers observe the same expiry semantics the
/// service enforces instead of a local validation error.
#[derive(Serialize, Deserialize, Clone)]
pub struct AccessToken {
	/// Bearer token secret; callers must avoid logging it.
	pub value: TokenSecret,
	/// Token type reported by the service (`Bearer`).
	pub token_type: String,
	/// Client identifier the service resolved from the API key.
	pub client_id: ClientId,
	/// Human-readable client name reported by the service.
	pub client_name: String,
	/// Instant the signing timestamp was captured for the exchange.
	pub issued_at: OffsetDateTime,
	/// Expiry instant derived from issued_at plus expires_in or absolute expiry.
	pub expires_at: OffsetDateTime,
}
impl AccessToken {
	/// Returns a builder for constructing token records.
	pub fn builder(client_id: ClientId) -> AccessTokenBuilder {
		AccessTokenBuilder::new(client_id)
	}

	/// Computes the lifecycle status at a given instant.
	///
	/// A token is valid strictly before `expires_at`; at that instant sharp it
	/// is already expired.
	pub fn status_at(&self, instant: OffsetDateTime) -> TokenStatus {
		if instant >= self.expires_at { TokenStatus::Expired } else { TokenStatus::Valid }
	}

	/// Convenience helper that checks the status using the current UTC instant.
	pub fn status(&self) -> TokenStatus {
		self.status_at(OffsetDateTime::now_utc())
	}

	/// Returns `true` if the record is valid at the provided instant.
	pub fn is_valid_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), TokenStatus::Valid)
	}

	/// Returns `true` if the record has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), TokenStatus::Expired)
	}

	/// Returns `true` if the record is expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		matches!(self.status(), TokenStatus::Expired)
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("value", &"<redacted>")
			.field("token_type", &self.token_type)
			.field("client_id", &self.client_id)
			.field("client_name", &self.client_name)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Builder for [`AccessToken`].
#[derive(Clone, Debug)]
pub struct AccessTokenBuilder {
	client_id: ClientId,
	client_name: String,
	value: Option<TokenSecret>,
	token_type: String,
	issued_at: Option<OffsetDateTime>,
	expires_at: Option<OffsetDateTime>,
	expires_in: Option<Duration>,
}
impl AccessTokenBuilder {
	fn new(client_id: ClientId) -> Self {
		Self {
			client_id,
			client_name: String::new(),
			value: None,
			token_type: "Bearer".into(),
			issued_at: None,
			expires_at: None,
			expires_in: None,
		}
	}

	/// Provides the bearer token value.
	pub fn value(mut self, token: impl Into<String>) -> Self {
		self.value = Some(TokenSecret::new(token));

		self
	}

	/// Overrides the token type label (defaults to `Bearer`).
	pub fn token_type(mut self, token_type: impl Into<String>) -> Self {
		self.token_type = token_type.into();

		self
	}

	/// Sets the human-readable client name.
	pub fn client_name(mut self, name: impl Into<String>) -> Self {
		self.client_name = name.into();

		self
	}

	/// Sets the issued-at instant.
	pub fn issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = Some(instant);

		self
	}

	/// Sets an absolute expiry instant.
	pub fn expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Sets a relative expiry duration from the issued instant.
	pub fn expires_in(mut self, duration: Duration) -> Self {
		self.expires_in = Some(duration);

		self
	}

	/// Consumes the builder and produces an [`AccessToken`].
	pub fn build(self) -> Result<AccessToken, AccessTokenBuilderError> {
		let value = self.value.ok_or(AccessTokenBuilderError::MissingValue)?;
		let issued_at = self.issued_at.unwrap_or_else(OffsetDateTime::now_utc);
		let expires_at = match (self.expires_at, self.expires_in) {
			(Some(instant), _) => instant,
			// The duration comes off the wire; overflow must be an error, not
			// a panic.
			(None, Some(delta)) => issued_at
				.checked_add(delta)
				.ok_or(AccessTokenBuilderError::ExpiryOutOfRange)?,
			(None, None) => return Err(AccessTokenBuilderError::MissingExpiry),
		};

		Ok(AccessToken {
			value,
			token_type: self.token_type,
			client_id: self.client_id,
			client_name: self.client_name,
			issued_at,
			expires_at,
		})
	}
}
