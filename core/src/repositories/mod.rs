//! Repository interfaces for external state.

pub mod blocklist;

pub use blocklist::{BlocklistStore, EntryTtl, KeyTtl};

#[cfg(any(test, feature = "mock"))]
pub use blocklist::MockBlocklistStore;
