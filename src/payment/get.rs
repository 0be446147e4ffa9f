//! `GET /api/v1/payment-links/{id}`.

// crates.io
use reqwest::Method;
// self
use crate::{
	_prelude::*,
	auth::PaymentLinkId,
	obs::{self, OpKind, OpOutcome, OpSpan},
	payment::{PAYMENT_LINKS_PATH, PaymentLink, PaymentLinkClient},
};

impl PaymentLinkClient {
	/// Fetches one payment link. Reads carry no idempotency key.
	pub async fn get_payment_link(&self, id: &PaymentLinkId) -> Result<PaymentLink> {
		const KIND: OpKind = OpKind::GetPaymentLink;

		let span = OpSpan::new(KIND, "get_payment_link");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span
			.instrument(async {
				let path = format!("{PAYMENT_LINKS_PATH}/{id}");

				self.send::<PaymentLink, ()>(&span, Method::GET, &path, None, None).await
			})
			.await;

		obs::record_op_outcome(KIND, OpOutcome::of(&result));

		result
	}

	/// Fetches a payment link by its raw identifier, validating it first.
	pub async fn get_payment_link_by_str(&self, id: &str) -> Result<PaymentLink> {
		let id = PaymentLinkId::new(id)?;

		self.get_payment_link(&id).await
	}
}
