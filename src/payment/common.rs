// crates.io
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::IdempotencyKey,
	error::{TransientError, TransportError},
	ext::RequestSignerExt,
	http::ResponseMetadata,
	obs::{self, OpSpan},
	payment::PaymentLinkClient,
	sign::{RequestAuthorization, RequestScope},
};

impl PaymentLinkClient {
	/// Signs, sends, and decodes one request.
	///
	/// A new token is minted on every call, so callers retrying after a transient failure
	/// never reuse an expired or differently scoped token.
	pub(super) async fn send<T, B>(
		&self,
		span: &OpSpan,
		method: Method,
		path: &str,
		idempotency_key: Option<IdempotencyKey>,
		body: Option<&B>,
	) -> Result<T>
	where
		T: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		let scope = RequestScope::new(method.as_str(), self.endpoint.authority(), path)?;
		let url = self.endpoint.url_for(scope.path())?;

		span.record_uri(&scope.uri());

		let authorization =
			RequestAuthorization { token: self.authenticator.sign_scope(&scope)?, idempotency_key };
		let mut request = self.http_client.request(method, url);

		if let Some(body) = body {
			request = request.json(body);
		}

		let request = self
			.signer
			.attach_authorization(request, &authorization)
			.unwrap_or_else(|never| match never {});
		let response = request.send().await.map_err(TransportError::from)?;
		let metadata = ResponseMetadata::from_response(&response);
		let status = response.status();

		span.record_status(status.as_u16());
		obs::record_api_status(span.kind(), status.as_u16());

		let bytes = response.bytes().await.map_err(TransportError::from)?;

		if status.is_success() {
			parse_json(&bytes, status)
		} else {
			Err(map_error_status(status, metadata, &bytes))
		}
	}
}

fn parse_json<T>(bytes: &[u8], status: StatusCode) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
		TransientError::ResponseParse { source, status: Some(status.as_u16()) }.into()
	})
}

fn map_error_status(status: StatusCode, metadata: ResponseMetadata, bytes: &[u8]) -> Error {
	let details = String::from_utf8_lossy(bytes).into_owned();

	if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
		TransientError::Upstream {
			message: details,
			status: status.as_u16(),
			retry_after: metadata.retry_after,
		}
		.into()
	} else {
		Error::Api { status: status.as_u16(), details }
	}
}
