//! Deterministic HMAC-SHA256 request signing.
//!
//! The canonical message is `"{METHOD}:{PATH}:{TIMESTAMP}:{BODY}"`, keyed by
//! the UTF-8 credential secret and hex-encoded lowercase. Identical inputs
//! always yield identical signatures; there is no randomness or salt, so the
//! service can recompute and compare digests without storing anything per
//! request.

// crates.io
use hmac::{Hmac, Mac};
use sha2::Sha256;
// self
use crate::_prelude::*;

/// HMAC-SHA256 type alias used for request signing.
pub type HmacSha256 = Hmac<Sha256>;

/// Builds the canonical signing message for a request.
///
/// `method` is the uppercase HTTP verb, `path` the exact request path without
/// host or query string, `timestamp` the decimal seconds-since-epoch string
/// that will travel in `X-Timestamp`, and `body` the byte-for-byte payload
/// serialization (empty string when absent).
pub fn canonical_message(method: &str, path: &str, timestamp: &str, body: &str) -> String {
	format!("{method}:{path}:{timestamp}:{body}")
}

/// Computes the lowercase hex HMAC-SHA256 signature for a request.
///
/// Pure function of its inputs; no side effects and no failure modes for
/// well-formed input. HMAC accepts keys of any length, so key setup cannot
/// fail.
pub fn sign(secret: &str, method: &str, path: &str, timestamp: &str, body: &str) -> String {
	let message = canonical_message(method, path, timestamp, body);
	let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
		.expect("HMAC-SHA256 accepts keys of any length.");

	mac.update(message.as_bytes());

	hex::encode(mac.finalize().into_bytes())
}

/// Formats an instant as the decimal seconds-since-epoch string the protocol
/// expects in `X-Timestamp`, with microsecond precision.
pub fn unix_timestamp_string(instant: OffsetDateTime) -> String {
	let nanos = instant.unix_timestamp_nanos();
	let secs = nanos.div_euclid(1_000_000_000);
	let micros = nanos.rem_euclid(1_000_000_000) / 1_000;

	format!("{secs}.{micros:06}")
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn golden_vector_matches_service_verifier() {
		// HMAC-SHA256("s1", "POST:/api/auth/token:1700000000.0:").
		let signature = sign("s1", "POST", "/api/auth/token", "1700000000.0", "");

		assert_eq!(
			signature,
			"ffdd9ba49a17fd341f3155cd010937860938c70278cba0ea2fb5ae6a74aa79bf"
		);
	}

	#[test]
	fn signing_is_deterministic() {
		let first = sign("s1", "POST", "/api/auth/token", "1700000000.0", "");
		let second = sign("s1", "POST", "/api/auth/token", "1700000000.0", "");

		assert_eq!(first, second);
	}

	#[test]
	fn any_single_input_change_alters_the_signature() {
		let base = sign("s1", "POST", "/api/auth/token", "1700000000.0", "");

		assert_ne!(base, sign("s2", "POST", "/api/auth/token", "1700000000.0", ""));
		assert_ne!(base, sign("s1", "GET", "/api/auth/token", "1700000000.0", ""));
		assert_ne!(base, sign("s1", "POST", "/api/auth/other", "1700000000.0", ""));
		assert_ne!(base, sign("s1", "POST", "/api/auth/token", "1700000001.0", ""));
		assert_ne!(base, sign("s1", "POST", "/api/auth/token", "1700000000.0", "{}"));
	}

	#[test]
	fn body_participates_in_the_digest() {
		let signature = sign("s1", "POST", "/api/auth/token", "1700000000.0", "{\"a\":1}");

		assert_eq!(
			signature,
			"c93ad15580657c3d11f7093f5c57f7ef00230ea1c618dba6cc3ac8362926ed08"
		);
	}

	#[test]
	fn canonical_message_uses_colon_delimiters() {
		assert_eq!(
			canonical_message("GET", "/api/health", "1.5", ""),
			"GET:/api/health:1.5:"
		);
	}

	#[test]
	fn timestamp_string_keeps_fractional_seconds() {
		let instant = macros::datetime!(2023-11-14 22:13:20 UTC);

		assert_eq!(unix_timestamp_string(instant), "1700000000.000000");
		assert_eq!(
			unix_timestamp_string(instant + time::Duration::microseconds(250)),
			"1700000000.000250"
		);
	}
}
