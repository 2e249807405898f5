pub mod links;
pub mod response;

pub use links::{ApiState, LinkApi, link_routes};
