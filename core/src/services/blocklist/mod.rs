//! Blocklist operations over the expiring key-value store

mod service;

#[cfg(test)]
mod tests;

pub use service::BlocklistService;
