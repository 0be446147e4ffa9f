//! Crate-level error types shared across signing, configuration, and the payment client.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Key material could not be parsed or used to sign.
	#[error(transparent)]
	Signing(#[from] SigningError),
	/// Temporary upstream failure; retry with a freshly signed request.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Payment API rejected the request.
	#[error("Payment API rejected the request with status {status}: {details}.")]
	Api {
		/// HTTP status code returned by the API.
		status: u16,
		/// Response body, verbatim.
		details: String,
	},
}
impl From<crate::auth::IdentifierError> for Error {
	fn from(e: crate::auth::IdentifierError) -> Self {
		Self::Config(e.into())
	}
}

/// Configuration and validation failures raised before any network or cryptographic work.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// No key identifier was configured.
	#[error("Signing key identifier is missing.")]
	MissingKeyIdentifier,
	/// No private key was configured.
	#[error("Signing private key is missing.")]
	MissingPrivateKey,
	/// An identifier failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
	/// HTTP method is not an uppercase token.
	#[error("HTTP method `{method}` is invalid.")]
	InvalidMethod {
		/// Method as supplied by the caller.
		method: String,
	},
	/// Host must be a bare authority such as `business.coinbase.com`.
	#[error("Request host `{host}` is invalid.")]
	InvalidHost {
		/// Host as supplied by the caller.
		host: String,
	},
	/// Path must start with `/`.
	#[error("Request path `{path}` must start with `/`.")]
	InvalidPath {
		/// Path as supplied by the caller.
		path: String,
	},
	/// Payment amount is not a positive decimal string.
	#[error("Payment amount `{amount}` must be a positive decimal.")]
	InvalidAmount {
		/// Amount as supplied by the caller.
		amount: String,
	},
	/// Payment link lifetime must be positive.
	#[error("Payment link lifetime must be positive, got {lifetime}.")]
	InvalidLifetime {
		/// Lifetime as supplied by the caller.
		lifetime: Duration,
	},
	/// API base URL cannot be parsed.
	#[error("API base URL is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// API base URL must use HTTPS.
	#[error("API base URL must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Key parsing and signing failures.
#[derive(Debug, ThisError)]
pub enum SigningError {
	/// PEM armor is malformed.
	#[error("Private key PEM is malformed: {reason}.")]
	MalformedPem {
		/// Which part of the armor failed.
		reason: &'static str,
	},
	/// Key body is not valid base64.
	#[error("Private key is not valid base64.")]
	InvalidEncoding(#[from] base64::DecodeError),
	/// Raw Ed25519 material has an unexpected length.
	#[error("Ed25519 private key must be 32 or 64 bytes, got {len}.")]
	InvalidKeyLength {
		/// Decoded byte length.
		len: usize,
	},
	/// PEM label or algorithm identifier names a key type no scheme accepts.
	#[error("Private key type `{label}` is not supported.")]
	UnsupportedKey {
		/// PEM label or algorithm description.
		label: String,
	},
	/// The public half of a 64-byte Ed25519 export does not match its seed.
	#[error("Ed25519 public key does not match the private seed.")]
	PublicKeyMismatch,
	/// ECDSA signing failed (malformed key or curve mismatch).
	#[error("ES256 signing failed.")]
	Es256(#[from] jsonwebtoken::errors::Error),
	/// Ed25519 signing failed.
	#[error("EdDSA signing failed.")]
	Ed25519(#[from] ed25519_dalek::SignatureError),
	/// Header or claims could not be serialized.
	#[error("Token segments could not be serialized.")]
	Encode(#[from] serde_json::Error),
	/// A compact token could not be split or decoded.
	#[error("Token is not a well-formed compact JWT.")]
	MalformedToken,
}

/// Temporary failure variants (safe to retry with a new token).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Payment API throttled the call or failed internally.
	#[error("Payment API returned status {status}: {message}.")]
	Upstream {
		/// Response body, verbatim.
		message: String,
		/// HTTP status code.
		status: u16,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Payment API responded with JSON that does not match the expected shape.
	#[error("Payment API returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (DNS, TCP, TLS, body streaming).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the payment API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
