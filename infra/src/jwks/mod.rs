//! Remote JSON Web Key Set support

pub mod client;


pub use client::{parse_key_set, JwksClient};
