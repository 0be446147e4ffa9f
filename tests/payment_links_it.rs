// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use cdp_request_auth::{
	_preludet::*,
	auth::{IdempotencyKey, IdentifierError, PaymentLinkId},
	error::{ConfigError, TransientError},
	payment::{CreatePaymentLinkRequest, PAYMENT_LINKS_PATH, PaymentLinkClient},
	sign::{FixedClock, RequestAuthenticator, decode_unverified},
};

fn signed_client(
	server: &MockServer,
	clock: Arc<FixedClock>,
) -> (PaymentLinkClient, Arc<RequestAuthenticator>) {
	let (_, credential) = ed25519_test_credential();
	let authenticator = Arc::new(deterministic_authenticator(&credential, clock));

	(build_test_client(&server.base_url(), authenticator.clone()), authenticator)
}

const LINK_BODY: &str = "{\"id\":\"abc123\",\"url\":\"https://pay.coinbase.com/abc123\",\"status\":\"ACTIVE\",\"amount\":\"10.00\",\"currency\":\"USDC\",\"network\":\"base\"}";

#[tokio::test]
async fn create_sends_signed_idempotent_json() {
	let server = MockServer::start_async().await;
	let (client, authenticator) = signed_client(&server, fixed_clock(FIXED_NOW));
	let key = IdempotencyKey::generate();
	let token = authenticator
		.sign("POST", client.endpoint.authority(), PAYMENT_LINKS_PATH)
		.expect("Expected token should sign.");
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(PAYMENT_LINKS_PATH)
				.header("authorization", token.bearer())
				.header("x-idempotency-key", key.to_string())
				.json_body(json!({
					"amount": "10.00",
					"currency": "USDC",
					"network": "base",
					"description": "Coffee mug",
					"expiresAt": "2023-11-21T22:13:20Z",
					"metadata": { "orderId": "order-42" },
				}));
			then.status(201).header("content-type", "application/json").body(LINK_BODY);
		})
		.await;
	let request = CreatePaymentLinkRequest::new("10.00", "Coffee mug").metadata_entry("orderId", "order-42");
	let link = client
		.create_payment_link_with_key(&request, key)
		.await
		.expect("Create should succeed.");

	assert_eq!(link.id.as_ref(), "abc123");
	assert_eq!(link.url.as_deref(), Some("https://pay.coinbase.com/abc123"));

	mock.assert_async().await;

	let (_, claims) = decode_unverified(&token).expect("Token should decode.");

	assert_eq!(claims.uri, format!("POST {}{PAYMENT_LINKS_PATH}", client.endpoint.authority()));
}

#[tokio::test]
async fn get_signs_the_item_path() {
	let server = MockServer::start_async().await;
	let (client, authenticator) = signed_client(&server, fixed_clock(FIXED_NOW));
	let path = format!("{PAYMENT_LINKS_PATH}/abc123");
	let token = authenticator
		.sign("GET", client.endpoint.authority(), &path)
		.expect("Expected token should sign.");
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(path.as_str()).header("authorization", token.bearer());
			then.status(200).header("content-type", "application/json").body(LINK_BODY);
		})
		.await;
	let link = client
		.get_payment_link(&PaymentLinkId::new("abc123").expect("Link id should be valid."))
		.await
		.expect("Get should succeed.");

	assert_eq!(link.status.as_deref(), Some("ACTIVE"));

	mock.assert_async().await;
}

#[tokio::test]
async fn retry_reuses_idempotency_key_with_a_new_token() {
	let server = MockServer::start_async().await;
	let clock = fixed_clock(FIXED_NOW);
	let (client, authenticator) = signed_client(&server, clock.clone());
	let key = IdempotencyKey::generate();
	let request = CreatePaymentLinkRequest::new("3.50", "Sticker pack");
	let mut unavailable = server
		.mock_async(|when, then| {
			when.method(POST).path(PAYMENT_LINKS_PATH).header("x-idempotency-key", key.to_string());
			then.status(503).header("retry-after", "1").body("maintenance");
		})
		.await;
	let err = client
		.create_payment_link_with_key(&request, key)
		.await
		.expect_err("Unavailable upstream should surface.");

	assert!(matches!(
		err,
		Error::Transient(TransientError::Upstream { status: 503, retry_after: Some(_), .. })
	));

	let first_token = authenticator
		.sign("POST", client.endpoint.authority(), PAYMENT_LINKS_PATH)
		.expect("Token should sign.");

	unavailable.assert_async().await;
	unavailable.delete_async().await;
	clock.advance(Duration::seconds(2));

	let retry_token = authenticator
		.sign("POST", client.endpoint.authority(), PAYMENT_LINKS_PATH)
		.expect("Token should sign.");

	assert_ne!(first_token, retry_token);

	let recovered = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(PAYMENT_LINKS_PATH)
				.header("authorization", retry_token.bearer())
				.header("x-idempotency-key", key.to_string());
			then.status(200).header("content-type", "application/json").body(LINK_BODY);
		})
		.await;

	client.create_payment_link_with_key(&request, key).await.expect("Retry should succeed.");
	recovered.assert_async().await;
}

#[tokio::test]
async fn client_errors_surface_as_api_errors() {
	let server = MockServer::start_async().await;
	let (client, _) = signed_client(&server, fixed_clock(FIXED_NOW));
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("{PAYMENT_LINKS_PATH}/missing"));
			then.status(404).body("{\"message\":\"not found\"}");
		})
		.await;
	let err = client
		.get_payment_link_by_str("missing")
		.await
		.expect_err("Missing link should surface.");

	assert!(matches!(err, Error::Api { status: 404, .. }));

	mock.assert_async().await;
}

#[tokio::test]
async fn throttling_carries_retry_after() {
	let server = MockServer::start_async().await;
	let (client, _) = signed_client(&server, fixed_clock(FIXED_NOW));
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("{PAYMENT_LINKS_PATH}/busy"));
			then.status(429).header("retry-after", "30").body("slow down");
		})
		.await;
	let err = client.get_payment_link_by_str("busy").await.expect_err("Throttling should surface.");

	match err {
		Error::Transient(TransientError::Upstream { status, retry_after, message }) => {
			assert_eq!(status, 429);
			assert_eq!(retry_after, Some(Duration::seconds(30)));
			assert_eq!(message, "slow down");
		},
		other => panic!("Expected throttling to be transient, got {other:?}."),
	}

	mock.assert_async().await;
}

#[tokio::test]
async fn malformed_success_body_is_a_parse_error() {
	let server = MockServer::start_async().await;
	let (client, _) = signed_client(&server, fixed_clock(FIXED_NOW));
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("{PAYMENT_LINKS_PATH}/weird"));
			then.status(200).header("content-type", "application/json").body("{\"id\":42}");
		})
		.await;
	let err = client.get_payment_link_by_str("weird").await.expect_err("Bad body should surface.");

	assert!(matches!(err, Error::Transient(TransientError::ResponseParse { status: Some(200), .. })));

	mock.assert_async().await;
}

#[tokio::test]
async fn invalid_requests_fail_before_any_call() {
	let server = MockServer::start_async().await;
	let (client, _) = signed_client(&server, fixed_clock(FIXED_NOW));
	let mock = server
		.mock_async(|_when, then| {
			then.status(200).body(LINK_BODY);
		})
		.await;
	let err = client
		.create_payment_link(&CreatePaymentLinkRequest::new("-5", "Refund?"))
		.await
		.expect_err("Negative amounts should be rejected.");

	assert!(matches!(err, Error::Config(ConfigError::InvalidAmount { .. })));

	let err = client
		.get_payment_link_by_str("../admin")
		.await
		.expect_err("Path-escaping ids should be rejected.");

	assert!(matches!(err, Error::Config(ConfigError::InvalidIdentifier(_))));

	for dots in [".", ".."] {
		let err = client
			.get_payment_link_by_str(dots)
			.await
			.expect_err("Dot segments would resolve to a different path than the one signed.");

		assert!(matches!(
			err,
			Error::Config(ConfigError::InvalidIdentifier(IdentifierError::DotSegment { .. }))
		));
	}

	mock.assert_calls_async(0).await;
}
