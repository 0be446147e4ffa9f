//! Request scope, header, and claims that make up a signed request token.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
// self
use crate::{
	_prelude::*,
	auth::{AuthToken, KeyId},
	error::{ConfigError, SigningError},
	sign::SigningAlgorithm,
};

/// Issuer claim expected by the payment API.
pub const ISSUER: &str = "cdp";
/// Lifetime of every token, in seconds.
pub const TOKEN_TTL_SECS: i64 = 120;
/// Random bytes carried in the `nonce` header.
pub const NONCE_LEN: usize = 16;

/// The exact method + host + path a token authorizes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RequestScope {
	method: String,
	host: String,
	path: String,
}
impl RequestScope {
	/// Validates and normalizes a request scope.
	///
	/// The method is upper-cased and any query string or fragment is dropped from the path,
	/// since neither participates in the `uri` claim.
	pub fn new(
		method: impl AsRef<str>,
		host: impl AsRef<str>,
		path: impl AsRef<str>,
	) -> Result<Self, ConfigError> {
		let method = method.as_ref();

		if method.is_empty() || !method.bytes().all(|b| b.is_ascii_alphabetic()) {
			return Err(ConfigError::InvalidMethod { method: method.to_owned() });
		}

		let host = host.as_ref();

		if host.is_empty()
			|| host.contains("://")
			|| host.chars().any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '@'))
		{
			return Err(ConfigError::InvalidHost { host: host.to_owned() });
		}

		let raw_path = path.as_ref();
		let path = raw_path.split(['?', '#']).next().unwrap_or_default();

		if !path.starts_with('/') || path.chars().any(char::is_whitespace) {
			return Err(ConfigError::InvalidPath { path: raw_path.to_owned() });
		}

		Ok(Self {
			method: method.to_ascii_uppercase(),
			host: host.to_owned(),
			path: path.to_owned(),
		})
	}

	/// Upper-cased HTTP method.
	pub fn method(&self) -> &str {
		&self.method
	}

	/// Host (and port, if any) the request targets.
	pub fn host(&self) -> &str {
		&self.host
	}

	/// Absolute path without query string.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Value of the `uri` claim: `"<METHOD> <HOST><PATH>"`.
	pub fn uri(&self) -> String {
		format!("{} {}{}", self.method, self.host, self.path)
	}
}
impl Display for RequestScope {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{} {}{}", self.method, self.host, self.path)
	}
}

/// Per-call signing context; lives only until the token is produced.
#[derive(Clone, Debug)]
pub struct SignedRequestContext<'a> {
	/// Scope bound into the `uri` claim.
	pub scope: &'a RequestScope,
	/// Issuance instant, truncated to whole seconds on the wire.
	pub issued_at: OffsetDateTime,
	/// Issuance plus [`TOKEN_TTL_SECS`].
	pub expires_at: OffsetDateTime,
}
impl<'a> SignedRequestContext<'a> {
	/// Opens a context for `scope` at `now`.
	pub fn new(scope: &'a RequestScope, now: OffsetDateTime) -> Self {
		Self { scope, issued_at: now, expires_at: now + Duration::seconds(TOKEN_TTL_SECS) }
	}

	/// Builds the claims set for `key_id`.
	pub fn claims(&self, key_id: &KeyId) -> TokenClaims {
		let nbf = self.issued_at.unix_timestamp();

		TokenClaims {
			iss: ISSUER.to_owned(),
			nbf,
			exp: nbf + TOKEN_TTL_SECS,
			sub: key_id.to_string(),
			uri: self.scope.uri(),
		}
	}
}

/// JOSE header of a request token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHeader {
	/// Signing algorithm.
	pub alg: SigningAlgorithm,
	/// Token type, always `JWT`.
	pub typ: String,
	/// Key identifier.
	pub kid: String,
	/// Hex-encoded random nonce, fresh per token.
	pub nonce: String,
}
impl TokenHeader {
	/// Builds a header for `alg` + `kid` carrying `nonce`.
	pub fn new(alg: SigningAlgorithm, kid: &KeyId, nonce: &[u8; NONCE_LEN]) -> Self {
		Self { alg, typ: "JWT".into(), kid: kid.to_string(), nonce: hex::encode(nonce) }
	}
}

/// Claims set of a request token; field order matches the wire format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
	/// Issuer, always [`ISSUER`].
	pub iss: String,
	/// Not-before, UNIX seconds.
	pub nbf: i64,
	/// Expiry, UNIX seconds; `nbf + 120`.
	pub exp: i64,
	/// Key identifier.
	pub sub: String,
	/// `"<METHOD> <HOST><PATH>"` of the authorized request.
	pub uri: String,
}
impl TokenClaims {
	/// Returns `true` when these claims authorize `scope` at `now`.
	///
	/// This mirrors the receiving service's check; it does not verify the signature.
	pub fn authorizes(&self, scope: &RequestScope, now: OffsetDateTime) -> bool {
		let now = now.unix_timestamp();

		self.uri == scope.uri() && self.nbf <= now && now < self.exp
	}
}

/// Decodes a token's header and claims without verifying the signature.
pub fn decode_unverified(token: &AuthToken) -> Result<(TokenHeader, TokenClaims), SigningError> {
	let (header, claims, _) = token.segments().ok_or(SigningError::MalformedToken)?;

	Ok((decode_segment(header)?, decode_segment(claims)?))
}

pub(crate) fn encode_segment<T>(value: &T) -> Result<String, SigningError>
where
	T: Serialize,
{
	Ok(URL_SAFE_NO_PAD.encode(serde_json::to_vec(value)?))
}

fn decode_segment<T>(segment: &str) -> Result<T, SigningError>
where
	T: for<'de> Deserialize<'de>,
{
	let bytes = URL_SAFE_NO_PAD.decode(segment).map_err(|_| SigningError::MalformedToken)?;

	serde_json::from_slice(&bytes).map_err(|_| SigningError::MalformedToken)
}
