//! # Subscriptions
//!
//! Everything needed to describe and register a Dapr pubsub subscription route.
//!
//! - [`SubscriptionDescriptor`] - metadata attached to one subscription route
//! - [`SubscriptionEntry`] - one record of the discovery response
//! - [`Subscribe`] / [`subscribe`] - the registrar
//! - [`SubscriptionDefinition`] - subscriptions declared as JSON data

pub mod definition;
pub mod descriptor;
pub mod subscribe;

pub use definition::{load_definitions, SubscriptionDefinition};
pub use descriptor::{SubscriptionDescriptor, SubscriptionEntry};
pub use subscribe::{subscribe, Subscribe};
