//! Public extension contracts for attaching request authorization to arbitrary HTTP clients.

pub mod request_signer;

pub use request_signer::*;
