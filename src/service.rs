//! Service descriptor data structures and helpers shared by exchange and
//! dispatch.
//!
//! A descriptor captures everything the client needs to know about one signed
//! API deployment in a transport-agnostic way: base URL, token endpoint path,
//! the server's clock-skew tolerance, and the published rate-limit budget.

// self
use crate::{_prelude::*, auth::ServiceId, error::ConfigError};

/// Default token endpoint path used by the signed exchange protocol.
pub const DEFAULT_TOKEN_PATH: &str = "/api/auth/token";
/// Default server-side clock-skew tolerance for signed timestamps.
pub const DEFAULT_SKEW_TOLERANCE: Duration = Duration::seconds(300);

/// Published per-client rate-limit budget for a service.
///
/// The client never enforces these numbers; they exist so callers that receive
/// [`Error::RateLimited`](crate::error::Error::RateLimited) can size their
/// backoff instead of tightening the retry loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitBudget {
	/// Token issuance requests allowed per minute per client.
	pub token_requests_per_minute: u32,
	/// General API requests allowed per minute per client.
	pub api_requests_per_minute: u32,
	/// Burst allowance within the burst window.
	pub burst_requests: u32,
	/// Window the burst allowance applies to.
	pub burst_window: Duration,
}
impl Default for RateLimitBudget {
	fn default() -> Self {
		Self {
			token_requests_per_minute: 10,
			api_requests_per_minute: 100,
			burst_requests: 20,
			burst_window: Duration::seconds(10),
		}
	}
}

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ServiceDescriptorError {
	/// Base URL is mandatory.
	#[error("Missing base URL.")]
	MissingBaseUrl,
	/// Token path must be absolute so signatures match the server's view.
	#[error("Token path must start with `/`: {path}.")]
	RelativeTokenPath {
		/// Path that failed validation.
		path: String,
	},
	/// Endpoints must use HTTPS outside of loopback development hosts.
	#[error("The base URL must use HTTPS: {url}.")]
	InsecureBaseUrl {
		/// Base URL that failed validation.
		url: String,
	},
	/// Skew tolerance cannot be negative.
	#[error("Clock-skew tolerance cannot be negative.")]
	NegativeSkewTolerance,
}

/// Immutable service descriptor consumed by the exchange client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
	/// Descriptor identifier.
	pub id: ServiceId,
	/// Base URL all request paths are joined onto.
	pub base_url: Url,
	/// Token endpoint path signed and POSTed during the exchange.
	pub token_path: String,
	/// Server-side tolerance for signed timestamps (applies in both
	/// directions).
	pub skew_tolerance: Duration,
	/// Published rate-limit budget for the service.
	pub rate_limits: RateLimitBudget,
}
impl ServiceDescriptor {
	/// Creates a new builder for the provided identifier.
	pub fn builder(id: ServiceId) -> ServiceDescriptorBuilder {
		ServiceDescriptorBuilder::new(id)
	}

	/// Joins a request path onto the base URL.
	pub fn endpoint_url(&self, path: &str) -> Result<Url, ConfigError> {
		self.base_url
			.join(path)
			.map_err(|source| ConfigError::InvalidPath { path: path.to_owned(), source })
	}

	/// Absolute URL of the token endpoint.
	pub fn token_url(&self) -> Result<Url, ConfigError> {
		self.endpoint_url(&self.token_path)
	}
}

/// Builder for [`ServiceDescriptor`] values.
#[derive(Debug)]
pub struct ServiceDescriptorBuilder {
	/// Identifier for the descriptor being constructed.
	pub id: ServiceId,
	/// Base URL all request paths are joined onto.
	pub base_url: Option<Url>,
	/// Token endpoint path (defaults to [`DEFAULT_TOKEN_PATH`]).
	pub token_path: String,
	/// Clock-skew tolerance (defaults to [`DEFAULT_SKEW_TOLERANCE`]).
	pub skew_tolerance: Duration,
	/// Rate-limit budget (defaults to the published service budget).
	pub rate_limits: RateLimitBudget,
}
impl ServiceDescriptorBuilder {
	/// Creates a new builder seeded with the provided identifier.
	pub fn new(id: ServiceId) -> Self {
		Self {
			id,
			base_url: None,
			token_path: DEFAULT_TOKEN_PATH.into(),
			skew_tolerance: DEFAULT_SKEW_TOLERANCE,
			rate_limits: RateLimitBudget::default(),
		}
	}

	/// Sets the base URL.
	pub fn base_url(mut self, url: Url) -> Self {
		self.base_url = Some(url);

		self
	}

	/// Overrides the token endpoint path.
	pub fn token_path(mut self, path: impl Into<String>) -> Self {
		self.token_path = path.into();

		self
	}

	/// Overrides the clock-skew tolerance.
	pub fn skew_tolerance(mut self, tolerance: Duration) -> Self {
		self.skew_tolerance = tolerance;

		self
	}

	/// Overrides the rate-limit budget.
	pub fn rate_limits(mut self, budget: RateLimitBudget) -> Self {
		self.rate_limits = budget;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ServiceDescriptor, ServiceDescriptorError> {
		let base_url = self.base_url.ok_or(ServiceDescriptorError::MissingBaseUrl)?;
		let descriptor = ServiceDescriptor {
			id: self.id,
			base_url,
			token_path: self.token_path,
			skew_tolerance: self.skew_tolerance,
			rate_limits: self.rate_limits,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ServiceDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), ServiceDescriptorError> {
		if !self.token_path.starts_with('/') {
			return Err(ServiceDescriptorError::RelativeTokenPath {
				path: self.token_path.clone(),
			});
		}
		if self.skew_tolerance.is_negative() {
			return Err(ServiceDescriptorError::NegativeSkewTolerance);
		}

		validate_base_url(&self.base_url)
	}
}

fn validate_base_url(url: &Url) -> Result<(), ServiceDescriptorError> {
	// Plain HTTP stays legal for loopback hosts so local mock servers work.
	let loopback = matches!(url.host_str(), Some("localhost" | "127.0.0.1" | "[::1]"));

	if url.scheme() == "https" || (url.scheme() == "http" && loopback) {
		Ok(())
	} else {
		Err(ServiceDescriptorError::InsecureBaseUrl { url: url.to_string() })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn service_id() -> ServiceId {
		ServiceId::new("dashboard").expect("Service identifier fixture should be valid.")
	}

	#[test]
	fn builder_applies_protocol_defaults() {
		let descriptor = ServiceDescriptor::builder(service_id())
			.base_url(Url::parse("https://dashboard.example.com").expect("Base URL should parse."))
			.build()
			.expect("Descriptor with defaults should build.");

		assert_eq!(descriptor.token_path, "/api/auth/token");
		assert_eq!(descriptor.skew_tolerance, Duration::seconds(300));
		assert_eq!(descriptor.rate_limits.token_requests_per_minute, 10);
		assert_eq!(descriptor.rate_limits.api_requests_per_minute, 100);
		assert_eq!(descriptor.rate_limits.burst_requests, 20);
		assert_eq!(
			descriptor.token_url().expect("Token URL should join.").as_str(),
			"https://dashboard.example.com/api/auth/token"
		);
	}

	#[test]
	fn descriptor_serde_round_trips() {
		let descriptor = ServiceDescriptor::builder(service_id())
			.base_url(Url::parse("https://dashboard.example.com").expect("Base URL should parse."))
			.build()
			.expect("Descriptor fixture should build.");
		let payload =
			serde_json::to_string(&descriptor).expect("Descriptor should serialize successfully.");
		let restored: ServiceDescriptor =
			serde_json::from_str(&payload).expect("Descriptor should deserialize successfully.");

		assert_eq!(restored, descriptor);
	}

	#[test]
	fn invalid_paths_surface_as_config_errors() {
		let descriptor = ServiceDescriptor::builder(service_id())
			.base_url(Url::parse("https://dashboard.example.com").expect("Base URL should parse."))
			.build()
			.expect("Descriptor fixture should build.");
		let err = descriptor
			.endpoint_url("http://[")
			.expect_err("Unjoinable paths should be rejected.");

		assert!(matches!(err, ConfigError::InvalidPath { path, .. } if path == "http://["));
	}

	#[test]
	fn non_loopback_http_is_rejected() {
		let err = ServiceDescriptor::builder(service_id())
			.base_url(Url::parse("http://dashboard.example.com").expect("Base URL should parse."))
			.build()
			.expect_err("Plain HTTP must be rejected for remote hosts.");

		assert!(matches!(err, ServiceDescriptorError::InsecureBaseUrl { .. }));

		ServiceDescriptor::builder(service_id())
			.base_url(Url::parse("http://127.0.0.1:8050").expect("Loopback URL should parse."))
			.build()
			.expect("Loopback HTTP should be allowed for development.");
	}

	#[test]
	fn relative_token_path_is_rejected() {
		let err = ServiceDescriptor::builder(service_id())
			.base_url(Url::parse("https://dashboard.example.com").expect("Base URL should parse."))
			.token_path("api/auth/token")
			.build()
			.expect_err("Relative token paths would break signature verification.");

		assert!(matches!(err, ServiceDescriptorError::RelativeTokenPath { .. }));
	}

	#[test]
	fn negative_skew_tolerance_is_rejected() {
		let err = ServiceDescriptor::builder(service_id())
			.base_url(Url::parse("https://dashboard.example.com").expect("Base URL should parse."))
			.skew_tolerance(Duration::seconds(-1))
			.build()
			.expect_err("Negative tolerance is meaningless.");

		assert!(matches!(err, ServiceDescriptorError::NegativeSkewTolerance));
	}
}
