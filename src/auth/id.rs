//! Strongly typed identifiers for signing keys and payment links.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal, $path_segment:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view, $path_segment)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value, $path_segment)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 256;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (key, payment link).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (key, payment link).
		kind: &'static str,
	},
	/// The identifier would escape its URL path segment.
	#[error("{kind} identifier contains `{found}`, which is not allowed in a path segment.")]
	ContainsReserved {
		/// Kind of identifier (key, payment link).
		kind: &'static str,
		/// Offending character.
		found: char,
	},
	/// The identifier is a `.` or `..` segment that URL resolution would collapse.
	#[error("{kind} identifier cannot be a dot segment.")]
	DotSegment {
		/// Kind of identifier (key, payment link).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (key, payment link).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { KeyId, "Identifier of a CDP API key, e.g. `organizations/{org}/apiKeys/{key}`.", "Key", false }
def_id! { PaymentLinkId, "Identifier of a payment link issued by the payment API.", "PaymentLink", true }

fn validate_view(
	kind: &'static str,
	view: &str,
	path_segment: bool,
) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if path_segment {
		if let Some(found) = view.chars().find(|c| matches!(c, '/' | '?' | '#' | '%')) {
			return Err(IdentifierError::ContainsReserved { kind, found });
		}
		if matches!(view, "." | "..") {
			return Err(IdentifierError::DotSegment { kind });
		}
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn key_ids_accept_organization_paths() {
		let key = KeyId::new("organizations/x/apiKeys/y")
			.expect("Organization-scoped key identifiers should be valid.");

		assert_eq!(key.as_ref(), "organizations/x/apiKeys/y");
		assert!(KeyId::new("").is_err());
		assert!(KeyId::new(" organizations/x").is_err(), "Leading whitespace must be rejected.");
	}

	#[test]
	fn payment_link_ids_stay_inside_one_segment() {
		PaymentLinkId::new("abc123").expect("Plain identifiers should be valid.");

		assert_eq!(
			PaymentLinkId::new("abc/../secret"),
			Err(IdentifierError::ContainsReserved { kind: "PaymentLink", found: '/' })
		);
		assert!(PaymentLinkId::new("abc?x=1").is_err());

		for dots in [".", ".."] {
			assert_eq!(
				PaymentLinkId::new(dots),
				Err(IdentifierError::DotSegment { kind: "PaymentLink" })
			);
		}

		PaymentLinkId::new("...").expect("Only exact dot segments are collapsed.");
		PaymentLinkId::new("v1.2").expect("Embedded dots should be valid.");
		KeyId::new("..").expect("Key identifiers never become path segments.");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let link: PaymentLinkId =
			serde_json::from_str("\"pl_42\"").expect("Payment link id should deserialize.");

		assert_eq!(link.as_ref(), "pl_42");
		assert!(serde_json::from_str::<PaymentLinkId>("\"with space\"").is_err());
	}

	#[test]
	fn length_limit_applies() {
		KeyId::new("a".repeat(IDENTIFIER_MAX_LEN)).expect("Exact length should succeed.");

		assert!(KeyId::new("a".repeat(IDENTIFIER_MAX_LEN + 1)).is_err());
	}
}
