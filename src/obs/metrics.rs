// self
use crate::{
	obs::{OpKind, OpOutcome},
	sign::SigningAlgorithm,
};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_op_outcome(kind: OpKind, outcome: OpOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"cdp_request_auth_op_total",
			"op" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Counts finished signatures per algorithm, so ES256 and EdDSA keys can be told apart.
pub fn record_sign_outcome(algorithm: SigningAlgorithm, outcome: OpOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"cdp_request_auth_sign_total",
			"alg" => algorithm.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (algorithm, outcome);
	}
}

/// Counts payment API responses by operation and [`status_class`].
pub fn record_api_status(kind: OpKind, status: u16) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"cdp_request_auth_api_response_total",
			"op" => kind.as_str(),
			"class" => status_class(status)
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, status);
	}
}

/// Buckets a status the way the client treats it: throttling is split out from other 4xx
/// because it is retried.
pub const fn status_class(status: u16) -> &'static str {
	match status {
		429 => "throttled",
		200..=299 => "2xx",
		400..=499 => "4xx",
		500..=599 => "5xx",
		_ => "other",
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recording_without_recorder_is_noop() {
		record_op_outcome(OpKind::CreatePaymentLink, OpOutcome::Failure);
		record_sign_outcome(SigningAlgorithm::EdDsa, OpOutcome::Success);
		record_api_status(OpKind::GetPaymentLink, 503);
	}

	#[test]
	fn throttling_has_its_own_status_class() {
		assert_eq!(status_class(201), "2xx");
		assert_eq!(status_class(404), "4xx");
		assert_eq!(status_class(429), "throttled");
		assert_eq!(status_class(502), "5xx");
		assert_eq!(status_class(302), "other");
	}
}
