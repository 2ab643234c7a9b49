//! jwtblock front ends: HTTP API, serverless handlers and command line.

pub mod app;
pub mod bootstrap;
pub mod cli;
pub mod commands;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod serverless;
