//! Bearer tokens and idempotency keys attached to outbound requests.

// crates.io
use uuid::Uuid;
// self
use crate::_prelude::*;

/// Compact signed token (`header.payload.signature`) that redacts itself from logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);
impl AuthToken {
	pub(crate) fn new(value: String) -> Self {
		Self(value)
	}

	/// Returns the compact token. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Formats the `Authorization` header value.
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.0)
	}

	/// Splits the token into its three base64url segments.
	pub fn segments(&self) -> Option<(&str, &str, &str)> {
		let mut parts = self.0.splitn(3, '.');
		let header = parts.next()?;
		let payload = parts.next()?;
		let signature = parts.next()?;

		if signature.contains('.') {
			return None;
		}

		Some((header, payload, signature))
	}
}
impl AsRef<str> for AuthToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for AuthToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AuthToken").field(&"<redacted>").finish()
	}
}
impl Display for AuthToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Client-generated identifier that lets the payment API collapse retried mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(Uuid);
impl IdempotencyKey {
	/// Generates a fresh random (v4) key.
	pub fn generate() -> Self {
		Self(Uuid::new_v4())
	}

	/// Returns the underlying UUID.
	pub fn as_uuid(&self) -> &Uuid {
		&self.0
	}
}
impl From<Uuid> for IdempotencyKey {
	fn from(value: Uuid) -> Self {
		Self(value)
	}
}
impl Display for IdempotencyKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		Display::fmt(&self.0.hyphenated(), f)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn token_formatters_redact() {
		let token = AuthToken::new("aaa.bbb.ccc".into());

		assert_eq!(format!("{token:?}"), "AuthToken(\"<redacted>\")");
		assert_eq!(format!("{token}"), "<redacted>");
		assert_eq!(token.bearer(), "Bearer aaa.bbb.ccc");
	}

	#[test]
	fn segments_require_exactly_three_parts() {
		assert_eq!(AuthToken::new("a.b.c".into()).segments(), Some(("a", "b", "c")));
		assert_eq!(AuthToken::new("a.b".into()).segments(), None);
		assert_eq!(AuthToken::new("a.b.c.d".into()).segments(), None);
	}

	#[test]
	fn idempotency_keys_are_unique_v4_uuids() {
		let first = IdempotencyKey::generate();
		let second = IdempotencyKey::generate();

		assert_ne!(first, second);
		assert_eq!(first.as_uuid().get_version_num(), 4);
		assert_eq!(first.to_string().len(), 36);
	}
}
