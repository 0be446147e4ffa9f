//! Wire models for the payment-link endpoints.

// crates.io
use serde_json::{Map, Value};
// self
use crate::{_prelude::*, auth::PaymentLinkId, error::ConfigError};

/// Settlement currency used when none is given.
pub const DEFAULT_CURRENCY: &str = "USDC";
/// Settlement network used when none is given.
pub const DEFAULT_NETWORK: &str = "base";
/// How long a new link stays payable when no lifetime is given.
pub const DEFAULT_LINK_LIFETIME: Duration = Duration::days(7);

/// Caller-facing description of a payment link to create.
#[derive(Clone, Debug, PartialEq)]
pub struct CreatePaymentLinkRequest {
	/// Decimal amount, e.g. `"10.00"`.
	pub amount: String,
	/// Settlement currency.
	pub currency: String,
	/// Settlement network.
	pub network: String,
	/// Human-readable description shown on the checkout page.
	pub description: String,
	/// Free-form metadata echoed back by the API (order ids, cart contents).
	pub metadata: Map<String, Value>,
	/// Where the payer lands after a successful payment.
	pub success_redirect_url: Option<Url>,
	/// Where the payer lands after a failed or cancelled payment.
	pub fail_redirect_url: Option<Url>,
	/// Lifetime of the link, counted from the moment it is sent.
	pub lifetime: Duration,
}
impl CreatePaymentLinkRequest {
	/// Starts a request for `amount` with the default currency, network, and lifetime.
	pub fn new(amount: impl Into<String>, description: impl Into<String>) -> Self {
		Self {
			amount: amount.into(),
			currency: DEFAULT_CURRENCY.into(),
			network: DEFAULT_NETWORK.into(),
			description: description.into(),
			metadata: Map::new(),
			success_redirect_url: None,
			fail_redirect_url: None,
			lifetime: DEFAULT_LINK_LIFETIME,
		}
	}

	/// Overrides the settlement currency.
	pub fn currency(mut self, currency: impl Into<String>) -> Self {
		self.currency = currency.into();

		self
	}

	/// Overrides the settlement network.
	pub fn network(mut self, network: impl Into<String>) -> Self {
		self.network = network.into();

		self
	}

	/// Adds one metadata entry.
	pub fn metadata_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.metadata.insert(key.into(), value.into());

		self
	}

	/// Sets the success redirect.
	pub fn success_redirect_url(mut self, url: Url) -> Self {
		self.success_redirect_url = Some(url);

		self
	}

	/// Sets the failure redirect.
	pub fn fail_redirect_url(mut self, url: Url) -> Self {
		self.fail_redirect_url = Some(url);

		self
	}

	/// Overrides how long the link stays payable.
	pub fn lifetime(mut self, lifetime: Duration) -> Self {
		self.lifetime = lifetime;

		self
	}

	/// Checks the amount and lifetime before anything is signed.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if !is_positive_decimal(&self.amount) {
			return Err(ConfigError::InvalidAmount { amount: self.amount.clone() });
		}
		if !self.lifetime.is_positive() {
			return Err(ConfigError::InvalidLifetime { lifetime: self.lifetime });
		}

		Ok(())
	}

	/// Renders the JSON body, stamping `expiresAt` relative to `now`.
	pub fn body(&self, now: OffsetDateTime) -> CreatePaymentLinkBody<'_> {
		CreatePaymentLinkBody {
			amount: &self.amount,
			currency: &self.currency,
			network: &self.network,
			description: &self.description,
			expires_at: now + self.lifetime,
			metadata: &self.metadata,
			success_redirect_url: self.success_redirect_url.as_ref().map(Url::as_str),
			fail_redirect_url: self.fail_redirect_url.as_ref().map(Url::as_str),
		}
	}
}

/// JSON body of `POST /api/v1/payment-links`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentLinkBody<'a> {
	/// Decimal amount.
	pub amount: &'a str,
	/// Settlement currency.
	pub currency: &'a str,
	/// Settlement network.
	pub network: &'a str,
	/// Description.
	pub description: &'a str,
	/// Absolute expiry, RFC 3339.
	#[serde(with = "time::serde::rfc3339")]
	pub expires_at: OffsetDateTime,
	/// Metadata object.
	pub metadata: &'a Map<String, Value>,
	/// Success redirect.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub success_redirect_url: Option<&'a str>,
	/// Failure redirect.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub fail_redirect_url: Option<&'a str>,
}

/// Payment link as returned by the API.
///
/// Only `id` is required; fields the API adds later are kept in [`PaymentLink::extra`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLink {
	/// Link identifier.
	pub id: PaymentLinkId,
	/// Checkout URL to hand to the payer.
	#[serde(default)]
	pub url: Option<String>,
	/// Lifecycle status reported by the API.
	#[serde(default)]
	pub status: Option<String>,
	/// Decimal amount.
	#[serde(default)]
	pub amount: Option<String>,
	/// Settlement currency.
	#[serde(default)]
	pub currency: Option<String>,
	/// Settlement network.
	#[serde(default)]
	pub network: Option<String>,
	/// Description.
	#[serde(default)]
	pub description: Option<String>,
	/// Absolute expiry.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub expires_at: Option<OffsetDateTime>,
	/// Metadata echoed back from creation.
	#[serde(default)]
	pub metadata: Map<String, Value>,
	/// Any other fields.
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}

fn is_positive_decimal(amount: &str) -> bool {
	let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
	let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());

	!whole.is_empty()
		&& digits_only(whole)
		&& digits_only(fraction)
		&& (!amount.contains('.') || !fraction.is_empty())
		&& amount.bytes().any(|b| matches!(b, b'1'..=b'9'))
}
