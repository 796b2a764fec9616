//! Redacted wrappers for the protocol's two secrets: the HMAC signing secret
//! and issued bearer tokens.
//!
//! Neither value may ever reach logs or error output. Both wrappers render
//! `<redacted>` through `Debug`/`Display`; the raw value is only reachable
//! through `expose()`, which the signing and header-assembly paths call at the
//! last moment.

// self
use crate::_prelude::*;

macro_rules! def_secret {
	($name:ident, $doc:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
		pub struct $name(String);
		impl $name {
			/// Wraps a new secret string.
			pub fn new(value: impl Into<String>) -> Self {
				Self(value.into())
			}

			/// Returns the inner value. Callers must avoid logging this string.
			pub fn expose(&self) -> &str {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				self.expose()
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.debug_tuple(stringify!($name)).field(&"<redacted>").finish()
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str("<redacted>")
			}
		}
	};
}

def_secret! { ApiSecret, "Shared secret half of an API credential; keys HMAC signatures and never travels on the wire." }
def_secret! { TokenSecret, "Issued bearer token value, transmitted only inside the `Authorization` header." }
