//! Signed request tokens for the Coinbase Business API: ES256/EdDSA JWTs scoped to one method,
//! host, and path, plus a thin payment-link client that signs every call it makes.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod ext;
pub mod http;
pub mod obs;
#[cfg(feature = "reqwest")] pub mod payment;
pub mod sign;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// crates.io
	use base64::{Engine as _, engine::general_purpose::STANDARD};
	// self
	use crate::{
		auth::SigningCredential,
		sign::{FixedClock, FixedNonceSource, RequestAuthenticator},
	};
	#[cfg(feature = "reqwest")]
	use crate::{
		http::{ApiEndpoint, ReqwestHttpClient},
		payment::PaymentLinkClient,
	};

	/// Key identifier shared by test fixtures.
	pub const TEST_KEY_ID: &str = "organizations/test-org/apiKeys/test-key";
	/// Instant (2023-11-14T22:13:20Z) most fixtures pin their clock to.
	pub const FIXED_NOW: i64 = 1_700_000_000;

	/// Generates a fresh Ed25519 key and returns it with its CDP-style base64 export
	/// (`seed || public key`, 64 bytes).
	pub fn ed25519_test_key() -> (ed25519_dalek::SigningKey, String) {
		let seed: [u8; 32] = rand::random();
		let key = ed25519_dalek::SigningKey::from_bytes(&seed);
		let mut exported = seed.to_vec();

		exported.extend_from_slice(key.verifying_key().as_bytes());

		(key, STANDARD.encode(exported))
	}

	/// Builds a [`SigningCredential`] around a freshly generated Ed25519 key.
	pub fn ed25519_test_credential() -> (ed25519_dalek::SigningKey, SigningCredential) {
		let (key, exported) = ed25519_test_key();
		let credential = SigningCredential::new(TEST_KEY_ID, exported)
			.expect("Ed25519 test credential should be valid.");

		(key, credential)
	}

	/// Pins a clock at `unix_seconds`; tests advance it to simulate retries.
	pub fn fixed_clock(unix_seconds: i64) -> Arc<FixedClock> {
		let now = OffsetDateTime::from_unix_timestamp(unix_seconds)
			.expect("Fixture timestamp should be in range.");

		Arc::new(FixedClock::new(now))
	}

	/// Builds an authenticator whose tokens are fully determined by `clock`.
	pub fn deterministic_authenticator(
		credential: &SigningCredential,
		clock: Arc<FixedClock>,
	) -> RequestAuthenticator {
		RequestAuthenticator::new(credential)
			.expect("Test credential should parse.")
			.with_clock(clock)
			.with_nonce_source(Arc::new(FixedNonceSource::new([7; 16])))
	}

	/// Generates a P-256 key and returns `(pkcs8_der, uncompressed_public_point)`.
	#[cfg(test)]
	pub fn p256_test_key() -> (Vec<u8>, Vec<u8>) {
		// crates.io
		use ring::{
			rand::SystemRandom,
			signature::{ECDSA_P256_SHA256_FIXED_SIGNING, EcdsaKeyPair, KeyPair},
		};

		let rng = SystemRandom::new();
		let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, &rng)
			.expect("P-256 key generation should succeed.");
		let pair = EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, pkcs8.as_ref(), &rng)
			.expect("Generated PKCS#8 should load.");

		(pkcs8.as_ref().to_vec(), pair.public_key().as_ref().to_vec())
	}

	/// Extracts the SEC1 `ECPrivateKey` wrapped by a PKCS#8 document.
	#[cfg(test)]
	pub fn sec1_from_pkcs8(pkcs8: &[u8]) -> &[u8] {
		// Skip the outer SEQUENCE header, the version INTEGER, and the AlgorithmIdentifier.
		let mut at = if pkcs8[1] & 0x80 == 0 { 2 } else { 2 + (pkcs8[1] & 0x7f) as usize };

		at += 3;
		at += 2 + pkcs8[at + 1] as usize;

		assert_eq!(pkcs8[at], 0x04, "PrivateKey must be an OCTET STRING.");

		let (len, header) = match pkcs8[at + 1] {
			0x81 => (pkcs8[at + 2] as usize, 3),
			short => (short as usize, 2),
		};

		&pkcs8[at + header..at + header + len]
	}

	/// Armors DER bytes as PEM with 64-column lines.
	pub fn pem(label: &str, der: &[u8]) -> String {
		let body = STANDARD.encode(der);
		let mut out = format!("-----BEGIN {label}-----\n");

		for line in body.as_bytes().chunks(64) {
			out.push_str(&String::from_utf8_lossy(line));
			out.push('\n');
		}

		out.push_str(&format!("-----END {label}-----\n"));

		out
	}

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	#[cfg(feature = "reqwest")]
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`PaymentLinkClient`] pointed at `base_url` and signing with `authenticator`.
	#[cfg(feature = "reqwest")]
	pub fn build_test_client(
		base_url: &str,
		authenticator: Arc<RequestAuthenticator>,
	) -> PaymentLinkClient {
		let endpoint = ApiEndpoint::parse(base_url).expect("Mock base URL should be accepted.");

		PaymentLinkClient::with_http_client(endpoint, authenticator, test_reqwest_http_client())
	}
}

mod _prelude {
	pub use std::{
		borrow::Cow,
		collections::BTreeMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
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
#[cfg(test)] use {color_eyre as _, httpmock as _, ring as _, tokio as _};
