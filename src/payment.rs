//! Payment-link client that signs every call it makes.
//!
//! Each request gets its own token scoped to the exact method and path being called. Creates
//! also carry an `X-Idempotency-Key`; to retry a create safely, pass the same key to
//! [`PaymentLinkClient::create_payment_link_with_key`] and the client signs a new token for
//! the new attempt.

pub mod model;

mod common;
mod create;
mod get;

pub use model::*;

// self
use crate::{
	_prelude::*,
	auth::SigningCredential,
	http::{ApiEndpoint, BearerHeaderSigner, ReqwestHttpClient},
	sign::RequestAuthenticator,
};

/// Collection path of the payment-link API.
pub const PAYMENT_LINKS_PATH: &str = "/api/v1/payment-links";

/// Calls the payment-link API with per-request signed tokens.
#[derive(Clone)]
pub struct PaymentLinkClient {
	/// API origin and the authority bound into every token.
	pub endpoint: ApiEndpoint,
	/// Shared, immutable request signer.
	pub authenticator: Arc<RequestAuthenticator>,
	/// HTTP client wrapper used for every outbound request.
	pub http_client: ReqwestHttpClient,
	signer: BearerHeaderSigner,
}
impl PaymentLinkClient {
	/// Creates a client with its own redirect-free reqwest transport.
	pub fn new(endpoint: ApiEndpoint, authenticator: Arc<RequestAuthenticator>) -> Result<Self> {
		let http_client = ReqwestHttpClient::new()?;

		Ok(Self::with_http_client(endpoint, authenticator, http_client))
	}

	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(
		endpoint: ApiEndpoint,
		authenticator: Arc<RequestAuthenticator>,
		http_client: ReqwestHttpClient,
	) -> Self {
		Self { endpoint, authenticator, http_client, signer: BearerHeaderSigner }
	}

	/// Builds credential, endpoint, and transport from the process environment.
	///
	/// Reads `CDP_API_KEY_NAME`, `CDP_API_KEY_PRIVATE_KEY`, and optionally `CDP_API_HOST`.
	pub fn from_env() -> Result<Self> {
		let credential = SigningCredential::from_env()?;
		let endpoint = ApiEndpoint::from_env()?;
		let authenticator = RequestAuthenticator::new(&credential)?;

		Self::new(endpoint, Arc::new(authenticator))
	}
}
impl Debug for PaymentLinkClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PaymentLinkClient")
			.field("endpoint", &self.endpoint)
			.field("authenticator", &self.authenticator)
			.finish()
	}
}
