//! HTTP surface
//!
//! - `middleware`: request id / tracing span
//! - `services`: link handlers and response builders

pub mod middleware;
pub mod services;
