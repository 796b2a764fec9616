//! Transport primitives for signed API exchanges.
//!
//! The module exposes [`HttpTransport`] alongside [`ApiRequest`] and
//! [`ApiResponse`] so downstream crates can integrate custom HTTP clients
//! without losing the client's error classification. Implementations must
//! honor the request's deadline (mapping expiry to
//! [`TransportError::Timeout`]) and surface the upstream `Retry-After` hint on
//! the response so rate-limit rejections carry usable backoff advice.

// std
use std::{ops::Deref, time::Duration as StdDuration};
// crates.io
#[cfg(feature = "reqwest")] use reqwest::header::{HeaderMap, RETRY_AFTER};
#[cfg(feature = "reqwest")] use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// HTTP verbs used by the signed protocol.
///
/// The canonical signing message embeds the uppercase verb, so the enum is the
/// single source for both the wire method and the signature input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
	/// HTTP GET.
	Get,
	/// HTTP POST.
	Post,
	/// HTTP PUT.
	Put,
	/// HTTP PATCH.
	Patch,
	/// HTTP DELETE.
	Delete,
}
impl Method {
	/// Returns the uppercase verb used on the wire and in signatures.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Patch => "PATCH",
			Method::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
#[cfg(feature = "reqwest")]
impl From<Method> for reqwest::Method {
	fn from(method: Method) -> Self {
		match method {
			Method::Get => reqwest::Method::GET,
			Method::Post => reqwest::Method::POST,
			Method::Put => reqwest::Method::PUT,
			Method::Patch => reqwest::Method::PATCH,
			Method::Delete => reqwest::Method::DELETE,
		}
	}
}

/// Transient outbound request handed to an [`HttpTransport`].
///
/// Constructed per call and never persisted; the body must be the exact
/// byte-for-byte serialization that was signed.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP verb.
	pub method: Method,
	/// Absolute request URL.
	pub url: Url,
	/// Header name/value pairs attached to the request.
	pub headers: Vec<(String, String)>,
	/// Request payload (empty string when absent).
	pub body: String,
	/// Caller-supplied deadline for the whole request.
	pub timeout: Option<StdDuration>,
}
impl ApiRequest {
	/// Creates a request with no headers, an empty body, and no deadline.
	pub fn new(method: Method, url: Url) -> Self {
		Self { method, url, headers: Vec::new(), body: String::new(), timeout: None }
	}

	/// Appends a header pair.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Sets the request payload.
	pub fn with_body(mut self, body: impl Into<String>) -> Self {
		self.body = body.into();

		self
	}

	/// Sets the caller-supplied deadline.
	pub fn with_timeout(mut self, timeout: Option<StdDuration>) -> Self {
		self.timeout = timeout;

		self
	}
}

/// Response surfaced by an [`HttpTransport`].
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Retry-After hint expressed as a relative duration, when supplied.
	pub retry_after: Option<Duration>,
	/// Response payload decoded as UTF-8.
	pub body: String,
}
impl ApiResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Abstraction over HTTP stacks capable of executing signed API requests.
///
/// The trait is the client's only dependency on an HTTP stack. Callers provide
/// an implementation (typically behind `Arc<T>` where `T: HttpTransport`) and
/// the client hands it fully built [`ApiRequest`] values. Implementations must
/// be `Send + Sync + 'static` so they can be shared across client instances,
/// and the returned futures must be `Send` for the lifetime of the in-flight
/// operation. Dropping the future must cancel the underlying call.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Executes the request, honoring its deadline.
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one
/// place. Signed requests must not follow redirects, because the signature
/// binds the exact path the client computed; configure any custom
/// [`ReqwestClient`] to disable redirect following.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestHttpTransport {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let mut builder =
				client.request(request.method.into(), request.url).body(request.body);

			for (name, value) in &request.headers {
				builder = builder.header(name, value);
			}
			if let Some(timeout) = request.timeout {
				builder = builder.timeout(timeout);
			}

			let response = builder.send().await.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let retry_after = parse_retry_after(response.headers());
			let body = response.text().await.map_err(TransportError::from)?;

			Ok(ApiResponse { status, retry_after, body })
		})
	}
}

#[cfg(feature = "reqwest")]
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<i64>() {
		return (secs >= 0).then(|| Duration::seconds(secs));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn methods_render_uppercase() {
		assert_eq!(Method::Get.as_str(), "GET");
		assert_eq!(Method::Post.to_string(), "POST");
	}

	#[test]
	fn request_builder_accumulates_headers() {
		let url = Url::parse("https://dashboard.example.com/api/auth/token")
			.expect("URL fixture should parse.");
		let request = ApiRequest::new(Method::Post, url)
			.with_header("X-API-Key", "demo")
			.with_header("X-Timestamp", "1700000000.0")
			.with_body("")
			.with_timeout(Some(StdDuration::from_secs(5)));

		assert_eq!(request.headers.len(), 2);
		assert_eq!(request.timeout, Some(StdDuration::from_secs(5)));
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn retry_after_rejects_out_of_range_values() {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, reqwest::header::HeaderValue::from_static("7"));

		assert_eq!(parse_retry_after(&headers), Some(Duration::seconds(7)));

		headers.insert(RETRY_AFTER, reqwest::header::HeaderValue::from_static("-7"));

		assert_eq!(parse_retry_after(&headers), None);

		// One past i64::MAX; must not wrap into a negative duration.
		headers.insert(
			RETRY_AFTER,
			reqwest::header::HeaderValue::from_static("9223372036854775808"),
		);

		assert_eq!(parse_retry_after(&headers), None);
	}

	#[test]
	fn success_covers_the_2xx_range() {
		let ok = ApiResponse { status: 204, retry_after: None, body: String::new() };
		let redirect = ApiResponse { status: 301, retry_after: None, body: String::new() };

		assert!(ok.is_success());
		assert!(!redirect.is_success());
	}
}
