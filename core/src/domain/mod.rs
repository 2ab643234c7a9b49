//! Domain layer: token fingerprints, claims, TTL values and operation results.

pub mod value_objects;

// Re-export commonly used domain types
pub use value_objects::*;
