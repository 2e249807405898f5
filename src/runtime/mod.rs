//! Application lifecycle and execution modes
//!
//! - `lifetime`: startup wiring and graceful shutdown
//! - `modes`: the HTTP server and the one-shot sweep

pub mod lifetime;
pub mod modes;
