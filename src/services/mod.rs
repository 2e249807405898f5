//! Service layer for business logic
//!
//! Shared by the HTTP handlers and the CLI sweep command.

mod link_service;
pub mod prober;
pub mod sweeper;

pub use link_service::*;
pub use prober::{HttpProber, LinkValidator, LivenessProbe, Rejection};
pub use sweeper::{AntiEntropySweeper, SweepReport, SweepSettings};
