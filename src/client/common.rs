//! Shared helpers for the exchange and dispatch paths (header names, payload
//! parsing, rejection classification).

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, http::ApiResponse};

/// Header carrying the public API key identifier.
pub const HEADER_API_KEY: &str = "X-API-Key";
/// Header carrying the lowercase hex HMAC-SHA256 signature.
pub const HEADER_SIGNATURE: &str = "X-Signature";
/// Header carrying the decimal seconds-since-epoch signing timestamp.
pub const HEADER_TIMESTAMP: &str = "X-Timestamp";
/// Header carrying the bearer token on authenticated calls.
pub const HEADER_AUTHORIZATION: &str = "Authorization";
/// Unauthenticated health probe path exposed by the service.
pub const HEALTH_PATH: &str = "/api/health";

/// Error payload shape the service uses for protocol rejections.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct RejectionBody {
	/// Service-supplied reason string.
	pub error: String,
}

/// Parses a JSON response body, reporting shape mismatches with the raw
/// payload attached for diagnostics.
pub(crate) fn parse_json<P>(response: &ApiResponse) -> Result<P>
where
	P: DeserializeOwned,
{
	let deserializer = &mut serde_json::Deserializer::from_str(&response.body);

	serde_path_to_error::deserialize(deserializer).map_err(|source| Error::MalformedResponse {
		source,
		status: response.status,
		raw: response.body.clone(),
	})
}

/// Maps a non-2xx service response onto a typed error kind.
///
/// Rate limits are classified by status alone because throttling middleware
/// frequently answers with non-JSON bodies; everything else is classified by
/// the `{ "error": ... }` payload when one is present, falling back to the
/// status code.
pub(crate) fn classify_rejection(response: &ApiResponse) -> Error {
	if response.status == 429 {
		return Error::RateLimited { retry_after: response.retry_after };
	}

	let reason = parse_json::<RejectionBody>(response).ok().map(|body| body.error);

	match (response.status, reason) {
		(401, Some(reason)) => classify_unauthorized(reason),
		(401, None) => Error::InvalidCredential { reason: "Authentication failed".into() },
		(403, Some(reason)) => Error::PermissionDenied { scope: extract_scope(&reason) },
		(403, None) => Error::PermissionDenied { scope: None },
		(status, reason) => Error::Upstream {
			status,
			message: reason.unwrap_or_else(|| summarize_body(&response.body)),
		},
	}
}

fn classify_unauthorized(reason: String) -> Error {
	let lower = reason.to_ascii_lowercase();

	if lower.contains("token expired") || lower.contains("invalid token") {
		Error::TokenExpired { reason }
	} else if lower.contains("request expired")
		|| lower.contains("invalid timestamp")
		|| lower.contains("clock")
	{
		Error::ClockSkew { reason }
	} else {
		// Missing headers, unknown API key, and signature mismatches all mean
		// the credential cannot authenticate; none of them are retryable.
		Error::InvalidCredential { reason }
	}
}

/// Pulls the required scope out of a `Permission denied: {scope} required`
/// reason string.
fn extract_scope(reason: &str) -> Option<String> {
	let rest = reason.strip_prefix("Permission denied: ")?;
	let scope = rest.strip_suffix(" required").unwrap_or(rest).trim();

	if scope.is_empty() { None } else { Some(scope.to_owned()) }
}

fn summarize_body(body: &str) -> String {
	const MAX_SUMMARY_LEN: usize = 256;

	let trimmed = body.trim();

	if trimmed.is_empty() {
		return "<empty body>".into();
	}

	let mut summary: String = trimmed.chars().take(MAX_SUMMARY_LEN).collect();

	if trimmed.chars().count() > MAX_SUMMARY_LEN {
		summary.push('…');
	}

	summary
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn rejection(status: u16, body: &str) -> ApiResponse {
		ApiResponse { status, retry_after: None, body: body.into() }
	}

	#[test]
	fn unauthorized_reasons_map_to_distinct_kinds() {
		let expired = classify_rejection(&rejection(401, "{\"error\":\"Token expired\"}"));
		let skew = classify_rejection(&rejection(
			401,
			"{\"error\":\"Request expired. Check system clock.\"}",
		));
		let timestamp = classify_rejection(&rejection(401, "{\"error\":\"Invalid timestamp\"}"));
		let key = classify_rejection(&rejection(401, "{\"error\":\"Invalid API key\"}"));
		let signature = classify_rejection(&rejection(401, "{\"error\":\"Invalid signature\"}"));
		let missing =
			classify_rejection(&rejection(401, "{\"error\":\"Missing authentication headers\"}"));

		assert!(matches!(expired, Error::TokenExpired { .. }));
		assert!(matches!(skew, Error::ClockSkew { .. }));
		assert!(matches!(timestamp, Error::ClockSkew { .. }));
		assert!(matches!(key, Error::InvalidCredential { .. }));
		assert!(matches!(signature, Error::InvalidCredential { .. }));
		assert!(matches!(missing, Error::InvalidCredential { .. }));
	}

	#[test]
	fn permission_denied_extracts_the_required_scope() {
		let denied = classify_rejection(&rejection(
			403,
			"{\"error\":\"Permission denied: read_reports required\"}",
		));

		assert!(matches!(denied, Error::PermissionDenied { scope: Some(scope) } if scope == "read_reports"));

		let bare = classify_rejection(&rejection(403, "{\"error\":\"Forbidden\"}"));

		assert!(matches!(bare, Error::PermissionDenied { scope: None }));
	}

	#[test]
	fn rate_limits_classify_by_status_alone() {
		let limited = classify_rejection(&ApiResponse {
			status: 429,
			retry_after: Some(Duration::seconds(12)),
			body: "slow down".into(),
		});

		assert!(matches!(limited, Error::RateLimited { retry_after: Some(delay) } if delay == Duration::seconds(12)));
	}

	#[test]
	fn unparseable_auth_bodies_fall_back_to_the_status() {
		let html = classify_rejection(&rejection(401, "<html>nope</html>"));

		assert!(matches!(html, Error::InvalidCredential { .. }));
	}

	#[test]
	fn non_auth_failures_surface_unmodified() {
		let upstream = classify_rejection(&rejection(500, "{\"error\":\"boom\"}"));

		assert!(matches!(upstream, Error::Upstream { status: 500, message } if message == "boom"));

		let raw = classify_rejection(&rejection(502, "bad gateway"));

		assert!(matches!(raw, Error::Upstream { status: 502, message } if message == "bad gateway"));
	}

	#[test]
	fn malformed_success_payloads_keep_the_raw_body() {
		let response = rejection(200, "{\"access_token\":42}");
		let err = parse_json::<RejectionBody>(&response)
			.expect_err("Shape mismatch should be surfaced.");

		assert!(matches!(&err, Error::MalformedResponse { raw, status: 200, .. } if raw.contains("access_token")));
	}
}
