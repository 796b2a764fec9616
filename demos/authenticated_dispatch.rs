//! Demonstrates authenticated request dispatch: the client obtains a bearer token on demand,
//! attaches it to API calls, and reuses the cached token across requests.

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
	http::Method,
	service::ServiceDescriptor,
	store::{MemoryStore, TokenStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"Bearer\",\"expires_in\":3600,\"client_id\":\"demo-client\",\"client_name\":\"Demo Client\"}",
			);
		})
		.await;
	let _health_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/health");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"status\":\"healthy\"}");
		})
		.await;
	let reports_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/reports").header("Authorization", "Bearer demo-access");
			then.status(200)
				.header("content-type", "application/json")
				.body("[{\"id\":7,\"period\":\"q3\"}]");
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
	)
	.with_timeout(std::time::Duration::from_secs(10));
	let health = client.health().await?;

	println!("Health probe: {}.", health.body);

	let first = client.send(Method::Get, "/api/reports", "").await?;
	let second = client.send(Method::Get, "/api/reports", "").await?;

	println!("First response: {}.", first.body);
	println!("Second response: {}.", second.body);

	// Two dispatches, one token exchange.
	token_mock.assert_async().await;
	reports_mock.assert_calls_async(2).await;

	Ok(())
}
