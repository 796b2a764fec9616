//! Auth-domain identifiers, credentials, secrets, and token models.

pub mod credential;
pub mod id;
pub mod secret;
pub mod token;

pub use credential::*;
pub use id::*;
pub use secret::*;
pub use token::record::*;
