//! Transport primitives for signed calls to the payment API.
//!
//! [`ApiEndpoint`] pins the origin every request goes to and the authority that ends up in the
//! token's `uri` claim, so the two can never drift apart. [`ReqwestHttpClient`] wraps the shared
//! reqwest client and [`BearerHeaderSigner`] attaches a [`RequestAuthorization`] to outbound
//! request builders.

// std
use std::{env, net::IpAddr};
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")] use reqwest::header::{AUTHORIZATION, HeaderMap, RETRY_AFTER};
#[cfg(feature = "reqwest")] use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, error::ConfigError};
#[cfg(feature = "reqwest")] use crate::{ext::RequestSignerExt, sign::RequestAuthorization};

/// Environment variable overriding the API host.
pub const ENV_API_HOST: &str = "CDP_API_HOST";
/// Host used when none is configured.
pub const DEFAULT_API_HOST: &str = "business.coinbase.com";
/// Header carrying the idempotency key on mutating requests.
pub const IDEMPOTENCY_KEY_HEADER: &str = "X-Idempotency-Key";

/// Validated API origin shared by URL construction and token scoping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiEndpoint {
	base: Url,
	authority: String,
}
impl ApiEndpoint {
	/// Parses and validates a base URL such as `https://business.coinbase.com`.
	///
	/// HTTPS is required; plain HTTP is tolerated only for loopback hosts.
	pub fn parse(base: &str) -> Result<Self, ConfigError> {
		let url = Url::parse(base).map_err(|source| ConfigError::InvalidEndpoint { source })?;

		Self::from_url(url)
	}

	/// Validates an already parsed base URL.
	pub fn from_url(url: Url) -> Result<Self, ConfigError> {
		let host = url
			.host_str()
			.ok_or(ConfigError::InvalidEndpoint { source: url::ParseError::EmptyHost })?;
		let secure = match url.scheme() {
			"https" => true,
			"http" => is_loopback(host),
			_ => false,
		};

		if !secure {
			return Err(ConfigError::InsecureEndpoint { url: url.to_string() });
		}

		let authority = match url.port() {
			Some(port) => format!("{host}:{port}"),
			None => host.to_owned(),
		};
		let mut base = url;

		base.set_path("");
		base.set_query(None);
		base.set_fragment(None);

		Ok(Self { base, authority })
	}

	/// Loads the host from [`ENV_API_HOST`], falling back to [`DEFAULT_API_HOST`].
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| env::var(name).ok())
	}

	/// Loads the host through an arbitrary variable lookup.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		match lookup(ENV_API_HOST).filter(|host| !host.trim().is_empty()) {
			Some(host) => Self::parse(&format!("https://{}", host.trim())),
			None => Ok(Self::default()),
		}
	}

	/// Host (plus non-default port) used in the `uri` claim.
	pub fn authority(&self) -> &str {
		&self.authority
	}

	/// Absolute URL for `path`, which must start with `/`.
	///
	/// Fails when URL resolution would send the request somewhere other than `path` (dot
	/// segments, characters that get percent-encoded), since the token is signed for `path`.
	pub fn url_for(&self, path: &str) -> Result<Url, ConfigError> {
		if !path.starts_with('/') {
			return Err(ConfigError::InvalidPath { path: path.to_owned() });
		}

		let url = self.base.join(path).map_err(|source| ConfigError::InvalidEndpoint { source })?;

		if url.path() != path {
			return Err(ConfigError::InvalidPath { path: path.to_owned() });
		}

		Ok(url)
	}
}
impl Default for ApiEndpoint {
	fn default() -> Self {
		Self {
			base: Url::parse(&format!("https://{DEFAULT_API_HOST}"))
				.unwrap_or_else(|_| unreachable!("The default API URL is valid.")),
			authority: DEFAULT_API_HOST.to_owned(),
		}
	}
}

fn is_loopback(host: &str) -> bool {
	host == "localhost"
		|| host.trim_start_matches('[').trim_end_matches(']').parse::<IpAddr>().is_ok_and(|ip| ip.is_loopback())
}

/// Metadata captured from the most recent API response for error mapping.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadata {
	/// HTTP status code, if a response arrived.
	pub status: Option<u16>,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
}
#[cfg(feature = "reqwest")]
impl ResponseMetadata {
	/// Captures status and Retry-After from a response.
	pub fn from_response(response: &reqwest::Response) -> Self {
		Self {
			status: Some(response.status().as_u16()),
			retry_after: parse_retry_after(response.headers()),
		}
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Signed requests must not follow redirects: the token is bound to the original host and path,
/// so a redirected request would carry a token the new target rejects.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client that never follows redirects.
	pub fn new() -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().redirect(reqwest::redirect::Policy::none()).build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Attaches `Authorization: Bearer` and, when present, `X-Idempotency-Key` to reqwest builders.
#[cfg(feature = "reqwest")]
#[derive(Clone, Copy, Debug, Default)]
pub struct BearerHeaderSigner;
#[cfg(feature = "reqwest")]
impl RequestSignerExt<reqwest::RequestBuilder, std::convert::Infallible> for BearerHeaderSigner {
	fn attach_authorization(
		&self,
		request: reqwest::RequestBuilder,
		authorization: &RequestAuthorization,
	) -> Result<reqwest::RequestBuilder, std::convert::Infallible> {
		let request = request.header(AUTHORIZATION, authorization.token.bearer());

		Ok(match authorization.idempotency_key {
			Some(key) => request.header(IDEMPOTENCY_KEY_HEADER, key.to_string()),
			None => request,
		})
	}
}

#[cfg(feature = "reqwest")]
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(secs as i64));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}
