//! Demonstrates exchanging an HMAC credential for a bearer token against a local mock service
//! using the default reqwest transport and in-memory token store.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use hmac_exchange::{
	auth::{ApiKey, Credential, ServiceId},
	client::ExchangeClient,
	service::ServiceDescriptor,
	store::{MemoryStore, TokenStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/auth/token")
				.header_exists("X-API-Key")
				.header_exists("X-Signature")
				.header_exists("X-Timestamp");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"Bearer\",\"expires_in\":3600,\"client_id\":\"demo-client\",\"client_name\":\"Demo Client\"}",
			);
		})
		.await;
	let descriptor = ServiceDescriptor::builder(ServiceId::new("demo-dashboard")?)
		.base_url(Url::parse(&server.base_url())?)
		.build()?;
	let store: Arc<dyn TokenStore> = Arc::new(MemoryStore::default());
	let client = ExchangeClient::new(
		store,
		descriptor,
		Credential::new(ApiKey::new("demo_api_key_12345")?, "demo_secret_67890"),
	);
	let token = client.get_token().await?;

	println!("Issued to {} ({}).", token.client_name, token.client_id);
	println!("Bearer token: {}.", token.value.expose());
	println!("Valid until {}.", token.expires_at);

	// A second call reuses the cache; the endpoint is hit exactly once.
	client.get_token().await?;

	token_mock.assert_async().await;

	Ok(())
}
