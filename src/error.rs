//! Client-level error types shared across signing, exchange, and dispatch.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The service rejected the API key or signature; fatal, do not retry.
	#[error("Service rejected the credential: {reason}.")]
	InvalidCredential {
		/// Service-supplied reason string.
		reason: String,
	},
	/// The signed timestamp fell outside the service's skew tolerance.
	#[error("Signed timestamp was rejected: {reason}.")]
	ClockSkew {
		/// Service-supplied reason string.
		reason: String,
	},
	/// The bearer token was rejected as expired or invalid.
	#[error("Bearer token was rejected: {reason}.")]
	TokenExpired {
		/// Service-supplied reason string.
		reason: String,
	},
	/// The operation requires a scope the credential does not hold.
	#[error("Permission denied{}.", fmt_scope(.scope))]
	PermissionDenied {
		/// Scope the service named as required, when it named one.
		scope: Option<String>,
	},
	/// The service throttled the request; retry after the indicated delay.
	#[error("Service rate limit exceeded.")]
	RateLimited {
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// The service returned a failure outside the authentication protocol.
	#[error("Service returned an unexpected response (status {status}): {message}.")]
	Upstream {
		/// HTTP status code returned by the service.
		status: u16,
		/// Response payload or summary.
		message: String,
	},
	/// The service payload did not match the expected shape.
	#[error("Service returned a malformed payload.")]
	MalformedResponse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: u16,
		/// Raw payload kept for diagnostics.
		raw: String,
	},
}
impl Error {
	/// Returns `true` when the error signals a rejected/expired bearer token,
	/// the only kind the dispatcher retries (once).
	pub fn is_token_expired(&self) -> bool {
		matches!(self, Self::TokenExpired { .. })
	}

	/// Returns the upstream Retry-After hint, when one was supplied.
	pub fn retry_after(&self) -> Option<Duration> {
		match self {
			Self::RateLimited { retry_after } => *retry_after,
			_ => None,
		}
	}
}

fn fmt_scope(scope: &Option<String>) -> String {
	match scope {
		Some(scope) => format!(": {scope} scope required"),
		None => String::new(),
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Request path cannot be joined onto the service base URL.
	#[error("Request path `{path}` is invalid.")]
	InvalidPath {
		/// The offending path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Token endpoint returned an excessively large `expires_in`.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
	/// Access token builder validation failed.
	#[error("Unable to build access token.")]
	TokenBuild(#[from] crate::auth::AccessTokenBuilderError),
	/// Identifier validation failed.
	#[error("Invalid identifier.")]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
}

/// Transport-level failures (network, IO, timeouts).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// The caller-supplied deadline elapsed before a response arrived.
	#[error("Request timed out before the service responded.")]
	Timeout,
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the service.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout } else { Self::network(e) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn token_expired_is_the_only_retryable_kind() {
		assert!(Error::TokenExpired { reason: "Token expired".into() }.is_token_expired());
		assert!(!Error::InvalidCredential { reason: "Invalid API key".into() }.is_token_expired());
		assert!(!Error::RateLimited { retry_after: None }.is_token_expired());
	}

	#[test]
	fn retry_after_surfaces_only_for_rate_limits() {
		let limited = Error::RateLimited { retry_after: Some(Duration::seconds(30)) };

		assert_eq!(limited.retry_after(), Some(Duration::seconds(30)));
		assert_eq!(Error::TokenExpired { reason: "Token expired".into() }.retry_after(), None);
	}

	#[test]
	fn permission_denied_names_the_scope() {
		let with_scope = Error::PermissionDenied { scope: Some("read_reports".into()) };
		let without = Error::PermissionDenied { scope: None };

		assert_eq!(with_scope.to_string(), "Permission denied: read_reports scope required.");
		assert_eq!(without.to_string(), "Permission denied.");
	}
}
