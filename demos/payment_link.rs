//! Demonstrates creating and fetching a payment link against a local mock of the API, with
//! every request carrying its own signed token and creates carrying an idempotency key.

// std
use std::sync::Arc;
// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use color_eyre::Result;
use httpmock::prelude::*;
// self
use cdp_request_auth::{
	auth::SigningCredential,
	http::{ApiEndpoint, ReqwestHttpClient},
	payment::{CreatePaymentLinkRequest, PAYMENT_LINKS_PATH, PaymentLinkClient},
	reqwest::Client,
	sign::{RequestAuthenticator, decode_unverified},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let create_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(PAYMENT_LINKS_PATH).header_exists("x-idempotency-key");
			then.status(201).header("content-type", "application/json").body(
				"{\"id\":\"demo-link\",\"url\":\"https://pay.coinbase.com/demo-link\",\"status\":\"ACTIVE\"}",
			);
		})
		.await;
	let get_mock = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("{PAYMENT_LINKS_PATH}/demo-link"));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":\"demo-link\",\"status\":\"COMPLETED\"}");
		})
		.await;
	// Same 64-byte base64 shape the CDP portal exports for Ed25519 keys.
	let seed: [u8; 32] = rand::random();
	let key = ed25519_dalek::SigningKey::from_bytes(&seed);
	let mut exported = seed.to_vec();

	exported.extend_from_slice(key.verifying_key().as_bytes());

	let credential = SigningCredential::new("organizations/demo/apiKeys/demo", STANDARD.encode(exported))?;
	let authenticator = Arc::new(RequestAuthenticator::new(&credential)?);
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let client = PaymentLinkClient::with_http_client(
		ApiEndpoint::parse(&server.base_url())?,
		authenticator.clone(),
		http_client,
	);
	let request = CreatePaymentLinkRequest::new("25.00", "Conference ticket")
		.metadata_entry("orderId", "order-1001");
	let link = client.create_payment_link(&request).await?;

	println!("Created payment link {} at {:?}.", link.id, link.url);

	let link = client.get_payment_link(&link.id).await?;

	println!("Payment link {} is {:?}.", link.id, link.status);

	let preview = authenticator.sign("GET", "business.coinbase.com", "/api/v1/payment-links/demo-link")?;
	let (header, claims) = decode_unverified(&preview)?;

	println!("A token signed with {:?} authorizes `{}` until {}.", header.alg, claims.uri, claims.exp);

	create_mock.assert_async().await;
	get_mock.assert_async().await;

	Ok(())
}
