//! Rust's turnkey HMAC token exchange client - deterministic request signing, coalesced
//! bearer-token caches, and retry-aware dispatch in one crate built for production.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod clock;
pub mod error;
pub mod http;
pub mod obs;
pub mod service;
pub mod sign;
pub mod store;
#[cfg(feature = "reqwest")]
pub mod _preludet {
	//! Convenience re-exports and helpers shared by the integration tests; not part of the stable
	//! API surface.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{ApiKey, Credential, ServiceId},
		client::ExchangeClient,
		http::ReqwestHttpTransport,
		service::ServiceDescriptor,
		store::{MemoryStore, TokenStore},
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = ExchangeClient<ReqwestHttpTransport>;

	/// Builds a descriptor pointed at a local mock server base URL.
	pub fn test_descriptor(base_url: &str) -> ServiceDescriptor {
		let service_id =
			ServiceId::new("mock-service").expect("Service identifier should be valid for tests.");

		ServiceDescriptor::builder(service_id)
			.base_url(Url::parse(base_url).expect("Mock base URL should parse successfully."))
			.build()
			.expect("Service descriptor should build successfully.")
	}

	/// Builds a credential fixture from raw key/secret strings.
	pub fn test_credential(key: &str, secret: &str) -> Credential {
		Credential::new(
			ApiKey::new(key).expect("API key fixture should be valid."),
			secret,
		)
	}

	/// Constructs an [`ExchangeClient`] backed by an in-memory store and the
	/// reqwest transport used across integration tests.
	pub fn build_reqwest_test_client(
		descriptor: ServiceDescriptor,
		key: &str,
		secret: &str,
	) -> (ReqwestTestClient, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn TokenStore> = store_backend.clone();
		let client = ExchangeClient::with_transport(
			store,
			descriptor,
			test_credential(key, secret),
			ReqwestHttpTransport::default(),
		);

		(client, store_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
