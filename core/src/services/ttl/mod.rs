//! TTL policy for new block records

mod policy;

pub use policy::TtlPolicy;
