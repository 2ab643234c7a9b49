//! Cache module for the Redis-backed blocklist
//!
//! Provides the Redis client (startup connection retry, bounded commands)
//! and the `BlocklistStore` implementation built on it.

pub mod blocklist_store;
pub mod redis_client;

#[cfg(test)]
mod tests;

pub use blocklist_store::RedisBlocklistStore;
pub use redis_client::{mask_url, RedisClient};

// Re-export commonly used types
pub use jb_shared::config::cache::CacheConfig;
