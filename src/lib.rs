#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # axum Dapr Helper
//!
//! Register axum routes as Dapr pubsub subscription endpoints and serve the
//! `GET /dapr/subscribe` discovery endpoint the Dapr sidecar reads at startup.
//!
//! ## Overview
//!
//! Two pieces work together at application setup time:
//!
//! - The **registrar** ([`Subscribe`] / [`subscribe`]) validates its inputs,
//!   registers a handler as `POST <path>` and attaches a
//!   [`SubscriptionDescriptor`] to that route.
//! - The **discovery aggregator** ([`DaprDiscovery`]) scans the route table once
//!   everything is registered, records every descriptor it finds and installs
//!   the discovery route. It can optionally strip the descriptors afterward.
//!
//! Nothing here receives or forwards pubsub events. The crate only records
//! where the sidecar should deliver them.
//!
//! ## Module Organization
//!
//! - [`subscription`] - descriptors, the registrar and JSON definitions
//! - [`registry`] - the discovery aggregator and its subscription registry
//! - [`web`] - the route table capability and its axum implementation
//! - [`config`] - layered settings
//! - [`logging`] - structured logging setup
//! - [`error`] - error types
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use axum::Json;
//! use axum_dapr_helper::{subscribe, DaprDiscovery, SubscriptionRouter};
//! use serde_json::{json, Value};
//!
//! async fn on_new_order(Json(event): Json<Value>) -> Json<Value> {
//!     tracing::info!(%event, "new order");
//!     Json(json!({"status": "SUCCESS"}))
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut app: SubscriptionRouter = SubscriptionRouter::new();
//! subscribe(&mut app, "/orders", "orders-pubsub", "new-order", on_new_order)?;
//!
//! let dapr = DaprDiscovery::new(false);
//! dapr.generate_subscribe_route(&mut app)?;
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app.into_router()).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod registry;
pub mod subscription;
pub mod web;

pub use config::DaprSettings;
pub use constants::{DAPR_EXTRA_KEY, DISCOVERY_PATH};
pub use error::{DaprError, Result};
pub use registry::{DaprDiscovery, RegistryStats, SubscriptionRegistry};
pub use subscription::{
    load_definitions, subscribe, Subscribe, SubscriptionDefinition, SubscriptionDescriptor,
    SubscriptionEntry,
};
pub use web::{RouteKey, RouteRecord, RouteTable, SubscriptionRouter};
