//! Request authentication: short-lived compact JWTs bound to one method, host, and path.
//!
//! [`RequestAuthenticator`] parses the configured key once and then signs a fresh token for
//! every outbound call. Each token carries:
//!
//! - header `{ alg, typ, kid, nonce }` with 16 random bytes of nonce, hex-encoded;
//! - claims `{ iss: "cdp", nbf, exp = nbf + 120, sub: kid, uri: "<METHOD> <HOST><PATH>" }`.
//!
//! Tokens are never cached: the receiving service rejects a token whose `uri` differs from the
//! request it accompanies, and the window is only two minutes.

pub mod claims;
pub mod key;
pub mod source;

pub use claims::*;
pub use key::*;
pub use source::*;

// self
use crate::{
	_prelude::*,
	auth::{AuthToken, IdempotencyKey, KeyId, SigningCredential},
	obs::{self, OpKind, OpOutcome, OpSpan},
};

/// Bearer token plus, for mutating requests, the idempotency key to send with it.
#[derive(Clone, Debug)]
pub struct RequestAuthorization {
	/// Token for the `Authorization: Bearer` header.
	pub token: AuthToken,
	/// Value for the `X-Idempotency-Key` header, present only for mutating requests.
	pub idempotency_key: Option<IdempotencyKey>,
}

/// Signs outbound requests with an immutable, pre-parsed credential.
#[derive(Clone)]
pub struct RequestAuthenticator {
	key_id: KeyId,
	key: SigningKey,
	clock: Arc<dyn Clock>,
	nonce_source: Arc<dyn NonceSource>,
}
impl RequestAuthenticator {
	/// Parses the credential's key material, selecting ES256 or EdDSA from its format.
	pub fn new(credential: &SigningCredential) -> Result<Self> {
		let key = SigningKey::parse(credential.private_key.expose())?;

		Ok(Self {
			key_id: credential.key_id.clone(),
			key,
			clock: Arc::new(SystemClock),
			nonce_source: Arc::new(OsNonceSource),
		})
	}

	/// Replaces the clock used for `nbf`/`exp`.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}

	/// Replaces the source of header nonces.
	pub fn with_nonce_source(mut self, nonce_source: Arc<dyn NonceSource>) -> Self {
		self.nonce_source = nonce_source;

		self
	}

	/// Key identifier placed in `kid` and `sub`.
	pub fn key_id(&self) -> &KeyId {
		&self.key_id
	}

	/// Algorithm selected for the configured key.
	pub fn algorithm(&self) -> SigningAlgorithm {
		self.key.algorithm()
	}

	/// Current instant according to the injected clock.
	pub fn now(&self) -> OffsetDateTime {
		self.clock.now()
	}

	/// Signs a token for `method host path`.
	pub fn sign(
		&self,
		method: impl AsRef<str>,
		host: impl AsRef<str>,
		path: impl AsRef<str>,
	) -> Result<AuthToken> {
		let scope = RequestScope::new(method, host, path)?;

		self.sign_scope(&scope)
	}

	/// Signs a token for an already validated scope.
	pub fn sign_scope(&self, scope: &RequestScope) -> Result<AuthToken> {
		const KIND: OpKind = OpKind::SignRequest;

		let span = OpSpan::new(KIND, "sign_scope");

		span.record_uri(&scope.uri());

		let _guard = span.entered();

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = self.encode(scope).map_err(Error::from);
		let outcome = OpOutcome::of(&result);

		obs::record_op_outcome(KIND, outcome);
		obs::record_sign_outcome(self.key.algorithm(), outcome);

		result
	}

	/// Signs a token for `scope` and, when `mutating`, generates an idempotency key.
	pub fn authorize(&self, scope: &RequestScope, mutating: bool) -> Result<RequestAuthorization> {
		Ok(RequestAuthorization {
			token: self.sign_scope(scope)?,
			idempotency_key: mutating.then(IdempotencyKey::generate),
		})
	}

	fn encode(&self, scope: &RequestScope) -> Result<AuthToken, crate::error::SigningError> {
		let context = SignedRequestContext::new(scope, self.clock.now());
		let mut nonce = [0; NONCE_LEN];

		self.nonce_source.fill(&mut nonce);

		let header = TokenHeader::new(self.key.algorithm(), &self.key_id, &nonce);
		let claims = context.claims(&self.key_id);
		let signing_input = format!("{}.{}", encode_segment(&header)?, encode_segment(&claims)?);
		let signature = self.key.sign(signing_input.as_bytes())?;

		Ok(AuthToken::new(format!("{signing_input}.{signature}")))
	}
}
impl Debug for RequestAuthenticator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestAuthenticator")
			.field("key_id", &self.key_id)
			.field("algorithm", &self.key.algorithm())
			.finish()
	}
}

/// One-shot signing: validates the credential, normalizes the key, parses it, and signs.
///
/// Missing `key_id` or `private_key` fails with a configuration error before any key parsing.
/// Long-lived callers should build a [`RequestAuthenticator`] once instead.
pub fn create_signed_token(
	method: &str,
	host: &str,
	path: &str,
	key_id: &str,
	private_key: &str,
) -> Result<AuthToken> {
	let credential = SigningCredential::new(key_id, private_key)?;

	RequestAuthenticator::new(&credential)?.sign(method, host, path)
}
