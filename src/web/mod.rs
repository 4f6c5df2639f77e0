//! # Web Layer
//!
//! The route table capability and its axum-backed implementation, plus the
//! discovery endpoint handler.

pub mod handlers;
pub mod route_table;
pub mod router;

pub use route_table::{RouteKey, RouteRecord, RouteTable};
pub use router::SubscriptionRouter;
