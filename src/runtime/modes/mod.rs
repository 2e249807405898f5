//! Mode routing
//!
//! - Server mode (HTTP server plus background sweeper)
//! - Sweep mode (one reclamation pass, then exit)

pub mod server;
pub mod sweep;

pub use server::run_server;
pub use sweep::run_sweep;
