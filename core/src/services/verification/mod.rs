//! Token verification pipeline
//!
//! Three independently toggled stages:
//! - parse: structural decode of the compact token
//! - validate: `exp`/`nbf` checks and the optional required `exp` claim
//! - verify: signature check against a static RSA/EC key, an HMAC secret,
//!   or a remote key set

mod config;
mod key_manager;
mod service;
mod traits;


pub use config::{KeySource, VerificationConfig};
pub use key_manager::VerificationKey;
pub use service::TokenVerifier;
pub use traits::KeySetProvider;
