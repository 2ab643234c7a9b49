//! Type definitions shared by the front ends

pub mod response;

pub use response::{HealthResponse, HealthStatus};
