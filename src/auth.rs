//! Auth-domain identifiers, signing credentials, and request tokens.

pub mod credential;
pub mod id;
pub mod token;

pub use credential::*;
pub use id::*;
pub use token::*;
