//! # Subscription Discovery
//!
//! Collects subscription descriptors from route tables and publishes them.
//!
//! ## Architecture
//!
//! ```text
//! SubscriptionRouter ──extract_route_info──▶ DaprDiscovery ──▶ SubscriptionRegistry
//!                                                 │
//!                                                 └── GET /dapr/subscribe (serves the registry)
//! ```

pub mod discovery;
pub mod subscription_registry;

pub use discovery::DaprDiscovery;
pub use subscription_registry::{RegistryStats, SubscriptionRegistry};
