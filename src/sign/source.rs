//! Injectable time and randomness sources for token construction.

// crates.io
use rand::Rng as _;
// self
use crate::{_prelude::*, sign::NONCE_LEN};

/// Supplies the issuance instant for new tokens.
pub trait Clock
where
	Self: Send + Sync,
{
	/// Returns the current instant.
	fn now(&self) -> OffsetDateTime;
}

/// Wall-clock time in UTC.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;
impl Clock for SystemClock {
	fn now(&self) -> OffsetDateTime {
		OffsetDateTime::now_utc()
	}
}

/// Manually driven clock for tests and replays.
#[derive(Debug)]
pub struct FixedClock(Mutex<OffsetDateTime>);
impl FixedClock {
	/// Pins the clock to `instant`.
	pub fn new(instant: OffsetDateTime) -> Self {
		Self(Mutex::new(instant))
	}

	/// Moves the clock to `instant`.
	pub fn set(&self, instant: OffsetDateTime) {
		*self.0.lock() = instant;
	}

	/// Moves the clock forward by `by`.
	pub fn advance(&self, by: Duration) {
		*self.0.lock() += by;
	}
}
impl Clock for FixedClock {
	fn now(&self) -> OffsetDateTime {
		*self.0.lock()
	}
}

/// Supplies the random bytes carried in each token's `nonce` header.
pub trait NonceSource
where
	Self: Send + Sync,
{
	/// Fills `nonce` with fresh bytes.
	fn fill(&self, nonce: &mut [u8; NONCE_LEN]);
}

/// Thread-local CSPRNG from `rand`.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsNonceSource;
impl NonceSource for OsNonceSource {
	fn fill(&self, nonce: &mut [u8; NONCE_LEN]) {
		rand::rng().fill(&mut nonce[..]);
	}
}

/// Always yields the same nonce. Only meant for deterministic tests.
#[derive(Clone, Copy, Debug)]
pub struct FixedNonceSource([u8; NONCE_LEN]);
impl FixedNonceSource {
	/// Pins every nonce to `nonce`.
	pub fn new(nonce: [u8; NONCE_LEN]) -> Self {
		Self(nonce)
	}
}
impl NonceSource for FixedNonceSource {
	fn fill(&self, nonce: &mut [u8; NONCE_LEN]) {
		*nonce = self.0;
	}
}
