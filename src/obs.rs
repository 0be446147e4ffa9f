//! Optional observability helpers for signing and payment-link calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `cdp_request_auth.op` with the `op` and
//!   `stage` (call site) fields.
//! - Enable `metrics` to increment the `cdp_request_auth_op_total` counter for every
//!   attempt/success/failure, labeled by `op` + `outcome`. Signatures are also counted in
//!   `cdp_request_auth_sign_total` by `alg` + `outcome`, and API responses in
//!   `cdp_request_auth_api_response_total` by `op` + `class`.
//!
//! Key material never reaches a span or metric label.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
	/// Building and signing a request token.
	SignRequest,
	/// Creating a payment link.
	CreatePaymentLink,
	/// Fetching a payment link.
	GetPaymentLink,
}
impl OpKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpKind::SignRequest => "sign_request",
			OpKind::CreatePaymentLink => "create_payment_link",
			OpKind::GetPaymentLink => "get_payment_link",
		}
	}
}
impl Display for OpKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
		}
	}

	/// Maps a result onto its outcome label.
	pub fn of<T, E>(result: &Result<T, E>) -> Self {
		match result {
			Ok(_) => OpOutcome::Success,
			Err(_) => OpOutcome::Failure,
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
