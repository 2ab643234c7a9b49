//! HTTP route handlers
//!
//! - `blocklist` - block and check endpoints
//! - `index` - liveness and health

pub mod blocklist;
pub mod index;

pub use blocklist::AppState;
