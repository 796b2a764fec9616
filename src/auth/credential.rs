//! API credential pair with a redacted signing secret.

// self
use crate::{
	_prelude::*,
	auth::{ApiKey, secret::ApiSecret},
};

/// Immutable API credential: a public key identifier plus the signing secret.
///
/// Read-only after construction; the client clones it freely but never mutates
/// it. The `Debug` output redacts the secret half.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
	/// Public identifier transmitted in the `X-API-Key` header.
	pub key: ApiKey,
	/// Shared secret used exclusively to sign requests.
	pub secret: ApiSecret,
}
impl Credential {
	/// Creates a credential from a key identifier and its signing secret.
	pub fn new(key: ApiKey, secret: impl Into<String>) -> Self {
		Self { key, secret: ApiSecret::new(secret) }
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential").field("key", &self.key).field("secret", &self.secret).finish()
	}
}
