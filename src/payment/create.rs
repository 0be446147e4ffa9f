//! `POST /api/v1/payment-links`.

// crates.io
use reqwest::Method;
// self
use crate::{
	_prelude::*,
	auth::IdempotencyKey,
	obs::{self, OpKind, OpOutcome, OpSpan},
	payment::{CreatePaymentLinkRequest, PAYMENT_LINKS_PATH, PaymentLink, PaymentLinkClient},
};

impl PaymentLinkClient {
	/// Creates a payment link under a freshly generated idempotency key.
	pub async fn create_payment_link(&self, request: &CreatePaymentLinkRequest) -> Result<PaymentLink> {
		self.create_payment_link_with_key(request, IdempotencyKey::generate()).await
	}

	/// Creates a payment link under `idempotency_key`.
	///
	/// Reuse the key when retrying the same logical create; the API then returns the link
	/// created by the first successful attempt instead of a duplicate.
	pub async fn create_payment_link_with_key(
		&self,
		request: &CreatePaymentLinkRequest,
		idempotency_key: IdempotencyKey,
	) -> Result<PaymentLink> {
		const KIND: OpKind = OpKind::CreatePaymentLink;

		let span = OpSpan::new(KIND, "create_payment_link");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span
			.instrument(async {
				request.validate()?;

				let body = request.body(self.authenticator.now());

				self.send::<PaymentLink, _>(&span, Method::POST, PAYMENT_LINKS_PATH, Some(idempotency_key), Some(&body))
					.await
			})
			.await;

		obs::record_op_outcome(KIND, OpOutcome::of(&result));

		result
	}
}
