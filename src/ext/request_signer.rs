//! Request signing contracts that let downstream crates attach signed tokens to arbitrary
//! HTTP clients.

// self
use crate::sign::RequestAuthorization;

/// Describes how to attach a [`RequestAuthorization`] to an outbound request without
/// constraining the HTTP client type.
///
/// Implementations must send the token as `Authorization: Bearer <token>` and, when the
/// authorization carries one, the idempotency key as `X-Idempotency-Key`. The crate ships
/// [`BearerHeaderSigner`](crate::http::BearerHeaderSigner) for `reqwest`.
pub trait RequestSignerExt<Request, Error>
where
	Self: Send + Sync,
{
	/// Consumes the provided request and injects the authorization headers.
	fn attach_authorization(
		&self,
		request: Request,
		authorization: &RequestAuthorization,
	) -> Result<Request, Error>;
}
